use emoji_error::{bail, ErrorType, Result};
use std::future::Future;
use strum::{AsRefStr, Display};
use uuid::Uuid;

#[derive(AsRefStr, Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Permission {
    #[strum(serialize = "emoji.add")]
    AddEmoji,
    #[strum(serialize = "emoji.remove")]
    RemoveEmoji,
}

/// User acting on the custom emoji registry
///
/// The host application decides what the user is allowed to do
pub trait Actor: Send + Sync {
    fn id(&self) -> Uuid;

    fn can(&self, permission: Permission) -> impl Future<Output = Result<bool>> + Send;
}

pub(crate) async fn assert_permission<A>(actor: &A, permission: Permission) -> Result<()>
where
    A: Actor,
{
    if !actor.can(permission).await? {
        bail!(
            type = ErrorType::Forbidden(None),
            format!("user does not have the \"{permission}\" permission")
        );
    }

    Ok(())
}
