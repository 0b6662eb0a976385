use emoji_error::Result;
use emoji_service::{Actor, Permission};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestActor {
    id: Uuid,
    permissions: Vec<Permission>,
}

impl TestActor {
    pub fn new<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        Self {
            id: Uuid::now_v7(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Actor allowed to do anything with custom emoji
    #[must_use]
    pub fn admin() -> Self {
        Self::new([Permission::AddEmoji, Permission::RemoveEmoji])
    }

    /// Actor not allowed to do anything
    #[must_use]
    pub fn powerless() -> Self {
        Self::new([])
    }
}

impl Actor for TestActor {
    fn id(&self) -> Uuid {
        self.id
    }

    async fn can(&self, permission: Permission) -> Result<bool> {
        Ok(self.permissions.contains(&permission))
    }
}
