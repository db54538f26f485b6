use serde::{Deserialize, Serialize};

use crate::domain::book::Book;

/// Stored user record. Not `Serialize`: the password hash stays server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    pub fn with_books(self, books: Vec<Book>) -> UserWithBooks {
        UserWithBooks {
            id: self.id,
            email: self.email,
            name: self.name,
            books,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: u32,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithBooks {
    pub id: u32,
    pub email: String,
    pub name: String,
    pub books: Vec<Book>,
}

/// Store-level creation input with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
