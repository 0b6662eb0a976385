use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CustomEmoji {
    pub shortcode: String,
    /// Key of the stored image, `<shortcode>.<extension>`
    pub name: String,
    /// `None` for emoji added by the system itself
    pub added_by: Option<Uuid>,
}
