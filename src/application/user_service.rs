use crate::domain::book::{Book, BookFilter};
use crate::domain::error::DomainError;
use crate::domain::repository::{BookRepository, UserRepository};
use crate::domain::user::{CreateUser, NewUser, PublicUser, UpdateUser, UserChanges, UserWithBooks};
use crate::infrastructure::security::hash_password;
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const USER_NOT_FOUND: &str = "User not found";
const EMAIL_TAKEN: &str = "A user with this email already exists";
const USER_OWNS_BOOKS: &str = "User still owns books";

pub struct UserService<U: UserRepository, B: BookRepository> {
    user_repository: Arc<U>,
    book_repository: Arc<B>,
}

impl<U: UserRepository, B: BookRepository> UserService<U, B> {
    pub fn new(user_repository: Arc<U>, book_repository: Arc<B>) -> Self {
        Self {
            user_repository,
            book_repository,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<UserWithBooks>> {
        let users = self.user_repository.find_all().await?;
        let mut result = Vec::with_capacity(users.len());
        for user in users {
            let books = self.books_of(user.id).await?;
            result.push(user.with_books(books));
        }
        Ok(result)
    }

    pub async fn get_user(&self, id: u32) -> Result<UserWithBooks> {
        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(USER_NOT_FOUND.to_string()))?;
        let books = self.books_of(user.id).await?;
        Ok(user.with_books(books))
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: CreateUser) -> Result<PublicUser> {
        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = self
            .user_repository
            .create(NewUser {
                email: req.email,
                name: req.name,
                password_hash,
            })
            .await
            .map_err(|err| DomainError::classify(err, USER_NOT_FOUND, EMAIL_TAKEN))?;

        info!(user_id = user.id, email = %user.email, "User created");
        Ok(user.to_public())
    }

    /// A plaintext password in the payload is re-hashed before it ever
    /// reaches the store.
    #[instrument(skip(self, req), fields(user_id = id))]
    pub async fn update_user(&self, id: u32, req: UpdateUser) -> Result<UserWithBooks> {
        let password_hash = match req.password {
            Some(password) => Some(hash_password(&password).map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })?),
            None => None,
        };
        let changes = UserChanges {
            email: req.email,
            name: req.name,
            password_hash,
        };

        let user = self
            .user_repository
            .update(id, changes)
            .await
            .map_err(|err| DomainError::classify(err, USER_NOT_FOUND, EMAIL_TAKEN))?;

        info!(user_id = user.id, "User updated");
        let books = self.books_of(user.id).await?;
        Ok(user.with_books(books))
    }

    #[instrument(skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, id: u32) -> Result<PublicUser> {
        let books = self.books_of(id).await?;
        if !books.is_empty() {
            warn!(user_id = id, book_count = books.len(), "Refusing to delete user with books");
            return Err(DomainError::Conflict(USER_OWNS_BOOKS.to_string()).into());
        }

        let user = self
            .user_repository
            .delete(id)
            .await
            .map_err(|err| DomainError::classify(err, USER_NOT_FOUND, EMAIL_TAKEN))?;

        info!(user_id = user.id, "User deleted");
        Ok(user.to_public())
    }

    async fn books_of(&self, author_id: u32) -> Result<Vec<Book>> {
        let filter = BookFilter {
            author_id: Some(author_id),
            ..Default::default()
        };
        self.book_repository.find_many(filter).await
    }
}
