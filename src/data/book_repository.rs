use crate::domain::book::{Book, BookChanges, BookFilter, NewBook};
use crate::domain::error::StoreError;
use crate::domain::repository::BookRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryBookRepository {
    storage: Arc<RwLock<HashMap<u32, Book>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn create(&self, book: NewBook) -> Result<Book> {
        let mut storage = self.storage.write().await;
        if storage.values().any(|existing| existing.title == book.title) {
            return Err(StoreError::UniqueViolation("title").into());
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = Book {
            id,
            title: book.title,
            cover: book.cover,
            category: book.category,
            price: book.price,
            featured: book.featured,
            author_id: book.author_id,
        };
        storage.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: u32) -> Result<Option<Book>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn find_many(&self, filter: BookFilter) -> Result<Vec<Book>> {
        let storage = self.storage.read().await;
        let mut books: Vec<Book> = storage
            .values()
            .filter(|book| {
                filter.category.is_none_or(|category| book.category == category)
                    && filter.featured.is_none_or(|featured| book.featured == featured)
                    && filter.author_id.is_none_or(|author_id| book.author_id == author_id)
            })
            .cloned()
            .collect();
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    async fn update(&self, id: u32, changes: BookChanges) -> Result<Book> {
        let mut storage = self.storage.write().await;
        // A missing id fails before any uniqueness concern.
        if !storage.contains_key(&id) {
            return Err(StoreError::RecordNotFound.into());
        }
        if let Some(title) = &changes.title {
            if storage
                .values()
                .any(|other| other.id != id && other.title == *title)
            {
                return Err(StoreError::UniqueViolation("title").into());
            }
        }
        let book = storage.get_mut(&id).ok_or(StoreError::RecordNotFound)?;
        if let Some(title) = changes.title {
            book.title = title;
        }
        if let Some(cover) = changes.cover {
            book.cover = cover;
        }
        if let Some(category) = changes.category {
            book.category = category;
        }
        if let Some(price) = changes.price {
            book.price = price;
        }
        if let Some(featured) = changes.featured {
            book.featured = featured;
        }
        if let Some(author_id) = changes.author_id {
            book.author_id = author_id;
        }
        Ok(book.clone())
    }

    async fn delete(&self, id: u32) -> Result<Book> {
        let mut storage = self.storage.write().await;
        let book = storage.remove(&id).ok_or(StoreError::RecordNotFound)?;
        Ok(book)
    }
}
