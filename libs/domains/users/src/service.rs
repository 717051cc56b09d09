use std::sync::Arc;

use crate::models::User;
use crate::repository::UserRepository;

/// Service layer for users; delegates straight to the repository
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_users(&self) -> Option<Vec<User>> {
        self.repository.list().await
    }

    pub async fn create_user(&self, user: User) -> Option<User> {
        self.repository.create(user).await
    }

    pub async fn update_user(&self, id: i64, user: User) -> Option<User> {
        self.repository.update(id, user).await
    }

    pub async fn delete_user(&self, id: i64) -> bool {
        self.repository.delete(id).await
    }
}
