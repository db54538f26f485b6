use crate::domain::book::{
    Book, BookChanges, BookFilter, BookWithAuthor, Category, CreateBook, DEFAULT_COVER, NewBook,
    UpdateBook,
};
use crate::domain::error::DomainError;
use crate::domain::repository::{BookRepository, UserRepository};
use crate::domain::user::{NewUser, PublicUser, User};
use crate::infrastructure::security::{hash_password, random_password};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

const BOOK_NOT_FOUND: &str = "Book not found";
const BOOK_OR_AUTHOR_NOT_FOUND: &str = "Book not found or invalid author id";
const TITLE_TAKEN: &str = "A book with this title already exists";
const REQUIRED_FIELDS: &str = "Title, author and category are required";

/// Length of the placeholder password given to auto-created authors.
const AUTHOR_PASSWORD_LEN: usize = 12;

pub struct BookService<B: BookRepository, U: UserRepository> {
    book_repository: Arc<B>,
    user_repository: Arc<U>,
}

impl<B: BookRepository, U: UserRepository> BookService<B, U> {
    pub fn new(book_repository: Arc<B>, user_repository: Arc<U>) -> Self {
        Self {
            book_repository,
            user_repository,
        }
    }

    pub async fn list_books(&self) -> Result<Vec<BookWithAuthor>> {
        let books = self.book_repository.find_many(BookFilter::default()).await?;
        self.embed_authors(books).await
    }

    pub async fn get_book(&self, id: u32) -> Result<BookWithAuthor> {
        let book = self
            .book_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(BOOK_NOT_FOUND.to_string()))?;
        self.embed_author(book).await
    }

    /// Shelf listing. The featured shelf is its own surface, so featured
    /// books are excluded here even when their category matches.
    pub async fn list_books_by_category(&self, raw_category: &str) -> Result<Vec<BookWithAuthor>> {
        let Some(category) = Category::parse(raw_category) else {
            debug!(category = raw_category, "Unknown category requested");
            return Ok(Vec::new());
        };
        let filter = BookFilter {
            category: Some(category),
            featured: Some(false),
            ..Default::default()
        };
        let books = self.book_repository.find_many(filter).await?;
        self.embed_authors(books).await
    }

    pub async fn list_featured_books(&self) -> Result<Vec<BookWithAuthor>> {
        let filter = BookFilter {
            featured: Some(true),
            ..Default::default()
        };
        let books = self.book_repository.find_many(filter).await?;
        self.embed_authors(books).await
    }

    /// Case-insensitive substring match over title, author name and
    /// category. A blank query means "everything".
    pub async fn search_books(&self, query: &str) -> Result<Vec<BookWithAuthor>> {
        if query.trim().is_empty() {
            return self.list_books().await;
        }
        let needle = query.to_lowercase();
        let books = self.list_books().await?;
        Ok(books
            .into_iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.name.to_lowercase().contains(&needle)
                    || book.category.as_str().contains(&needle)
            })
            .collect())
    }

    #[instrument(skip(self, req), fields(title = %req.title, author_email = %req.author_email))]
    pub async fn create_book(&self, req: CreateBook) -> Result<BookWithAuthor> {
        let category = match req.category {
            Some(category)
                if !req.title.is_empty()
                    && !req.author_name.is_empty()
                    && !req.author_email.is_empty() =>
            {
                category
            }
            _ => {
                warn!("Book creation rejected, required fields missing");
                return Err(DomainError::Validation(REQUIRED_FIELDS.to_string()).into());
            }
        };

        let author = self
            .find_or_create_author(&req.author_name, &req.author_email)
            .await?;

        let new_book = NewBook {
            title: req.title,
            cover: req.cover.unwrap_or_else(|| DEFAULT_COVER.to_string()),
            category,
            price: req.price.unwrap_or(0),
            featured: req.featured.unwrap_or(false),
            author_id: author.id,
        };
        let created = self
            .book_repository
            .create(new_book)
            .await
            .map_err(|err| DomainError::classify(err, BOOK_NOT_FOUND, TITLE_TAKEN))?;

        info!(book_id = created.id, author_id = author.id, "Book created");
        Ok(BookWithAuthor::new(created, author.to_public()))
    }

    #[instrument(skip(self, req), fields(book_id = id))]
    pub async fn update_book(&self, id: u32, req: UpdateBook) -> Result<BookWithAuthor> {
        // A new author link must point at an existing user before the
        // book itself is touched.
        if let Some(author_id) = req.author_id {
            if self.user_repository.find_by_id(author_id).await?.is_none() {
                warn!(author_id, "Update referenced a missing author");
                return Err(
                    DomainError::NotFound(BOOK_OR_AUTHOR_NOT_FOUND.to_string()).into(),
                );
            }
        }

        let updated = self
            .book_repository
            .update(id, BookChanges::from(req))
            .await
            .map_err(|err| DomainError::classify(err, BOOK_OR_AUTHOR_NOT_FOUND, TITLE_TAKEN))?;

        info!(book_id = updated.id, "Book updated");
        self.embed_author(updated).await
    }

    #[instrument(skip(self), fields(book_id = id))]
    pub async fn delete_book(&self, id: u32) -> Result<Book> {
        let deleted = self
            .book_repository
            .delete(id)
            .await
            .map_err(|err| DomainError::classify(err, BOOK_NOT_FOUND, TITLE_TAKEN))?;

        info!(book_id = deleted.id, "Book deleted");
        Ok(deleted)
    }

    async fn find_or_create_author(&self, name: &str, email: &str) -> Result<User> {
        if let Some(existing) = self.user_repository.find_by_email(email).await? {
            debug!(author_id = existing.id, "Reusing existing author");
            return Ok(existing);
        }

        let password_hash = hash_password(&random_password(AUTHOR_PASSWORD_LEN)).map_err(|e| {
            error!(error = %e, "Failed to hash generated author password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;
        let author = self
            .user_repository
            .create(NewUser {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
            })
            .await
            .map_err(|err| {
                DomainError::classify(err, BOOK_NOT_FOUND, "A user with this email already exists")
            })?;

        info!(author_id = author.id, "Created author for new book");
        Ok(author)
    }

    async fn embed_author(&self, book: Book) -> Result<BookWithAuthor> {
        let author = self
            .user_repository
            .find_by_id(book.author_id)
            .await?
            .ok_or_else(|| {
                error!(book_id = book.id, author_id = book.author_id, "Author record missing");
                DomainError::Internal(format!(
                    "Author {} missing for book {}",
                    book.author_id, book.id
                ))
            })?;
        Ok(BookWithAuthor::new(book, author.to_public()))
    }

    async fn embed_authors(&self, books: Vec<Book>) -> Result<Vec<BookWithAuthor>> {
        let authors: HashMap<u32, PublicUser> = self
            .user_repository
            .find_all()
            .await?
            .iter()
            .map(|user| (user.id, user.to_public()))
            .collect();

        books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author_id).cloned().ok_or_else(|| {
                    error!(book_id = book.id, author_id = book.author_id, "Author record missing");
                    anyhow::Error::from(DomainError::Internal(format!(
                        "Author {} missing for book {}",
                        book.author_id, book.id
                    )))
                })?;
                Ok(BookWithAuthor::new(book, author))
            })
            .collect()
    }
}
