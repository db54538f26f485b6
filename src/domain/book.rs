use serde::{Deserialize, Serialize};

use crate::domain::user::PublicUser;

/// Cover asset assigned when a creation request carries none.
pub const DEFAULT_COVER: &str = "/img/fiction-1.jpg";

/// Closed set of catalog shelves. Parsing is exact and case-sensitive,
/// matching the store's string representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Fiction,
    Science,
    History,
    Biography,
    NonFiction,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Fiction,
        Category::Science,
        Category::History,
        Category::Biography,
        Category::NonFiction,
    ];

    pub const NAMES: [&'static str; 5] =
        ["fiction", "science", "history", "biography", "non-fiction"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fiction => "fiction",
            Category::Science => "science",
            Category::History => "history",
            Category::Biography => "biography",
            Category::NonFiction => "non-fiction",
        }
    }

    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "fiction" => Some(Category::Fiction),
            "science" => Some(Category::Science),
            "history" => Some(Category::History),
            "biography" => Some(Category::Biography),
            "non-fiction" => Some(Category::NonFiction),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub cover: String,
    pub category: Category,
    pub price: u32,
    pub featured: bool,
    pub author_id: u32,
}

/// Book read projection with the owning user embedded, password excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookWithAuthor {
    pub id: u32,
    pub title: String,
    pub cover: String,
    pub category: Category,
    pub price: u32,
    pub featured: bool,
    pub author_id: u32,
    pub author: PublicUser,
}

impl BookWithAuthor {
    pub fn new(book: Book, author: PublicUser) -> Self {
        Self {
            id: book.id,
            title: book.title,
            cover: book.cover,
            category: book.category,
            price: book.price,
            featured: book.featured,
            author_id: book.author_id,
            author,
        }
    }
}

/// Store-level creation input; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub cover: String,
    pub category: Category,
    pub price: u32,
    pub featured: bool,
    pub author_id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub cover: Option<String>,
    pub category: Option<Category>,
    pub price: Option<u32>,
    pub featured: Option<bool>,
    pub author_id: Option<u32>,
}

/// `find_many` clauses; `None` fields do not constrain the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub author_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    #[serde(alias = "author")]
    pub author_name: String,
    pub author_email: String,
    pub category: Option<Category>,
    pub cover: Option<String>,
    pub price: Option<u32>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub cover: Option<String>,
    pub category: Option<Category>,
    pub price: Option<u32>,
    pub featured: Option<bool>,
    pub author_id: Option<u32>,
}

impl From<UpdateBook> for BookChanges {
    fn from(update: UpdateBook) -> Self {
        BookChanges {
            title: update.title,
            cover: update.cover,
            category: update.category,
            price: update.price,
            featured: update.featured,
            author_id: update.author_id,
        }
    }
}
