use crate::domain::book::{Book, BookChanges, BookFilter, NewBook};
use crate::domain::user::{NewUser, User, UserChanges};
use anyhow::Result;
use async_trait::async_trait;

/// Book record store. Implementations assign ids and keep listings
/// ordered by ascending id.
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, book: NewBook) -> Result<Book>;
    async fn find_by_id(&self, id: u32) -> Result<Option<Book>>;
    async fn find_many(&self, filter: BookFilter) -> Result<Vec<Book>>;
    async fn update(&self, id: u32, changes: BookChanges) -> Result<Book>;
    async fn delete(&self, id: u32) -> Result<Book>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: u32) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_all(&self) -> Result<Vec<User>>;
    async fn update(&self, id: u32, changes: UserChanges) -> Result<User>;
    async fn delete(&self, id: u32) -> Result<User>;
}
