use crate::application::book_service::BookService;
use crate::domain::book::{Category, CreateBook};
use crate::domain::repository::{BookRepository, UserRepository};
use tracing::{info, warn};

/// Loads the starter catalog through the regular creation path, so
/// authors are provisioned exactly as they would be over the API.
/// A failed entry is logged and skipped; startup continues.
pub async fn seed_catalog<B: BookRepository, U: UserRepository>(service: &BookService<B, U>) {
    let mut created = 0;
    for book in starter_catalog() {
        let title = book.title.clone();
        match service.create_book(book).await {
            Ok(_) => created += 1,
            Err(err) => warn!(title = %title, error = %err, "Failed to seed book"),
        }
    }
    info!(count = created, "Seeded catalog");
}

fn entry(
    title: &str,
    author_name: &str,
    author_email: &str,
    category: Category,
    cover: &str,
    price: u32,
    featured: bool,
) -> CreateBook {
    CreateBook {
        title: title.to_string(),
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        category: Some(category),
        cover: Some(cover.to_string()),
        price: Some(price),
        featured: Some(featured),
    }
}

fn starter_catalog() -> Vec<CreateBook> {
    vec![
        entry(
            "Dune",
            "Frank Herbert",
            "frank.herbert@authors.example.com",
            Category::Fiction,
            "/img/fiction-1.jpg",
            25,
            true,
        ),
        entry(
            "1984",
            "George Orwell",
            "george.orwell@authors.example.com",
            Category::Fiction,
            "/img/fiction-2.jpg",
            18,
            false,
        ),
        entry(
            "Animal Farm",
            "George Orwell",
            "george.orwell@authors.example.com",
            Category::Fiction,
            "/img/fiction-3.jpg",
            15,
            false,
        ),
        entry(
            "Brave New World",
            "Aldous Huxley",
            "aldous.huxley@authors.example.com",
            Category::Fiction,
            "/img/fiction-4.jpg",
            19,
            false,
        ),
        entry(
            "Cosmos",
            "Carl Sagan",
            "carl.sagan@authors.example.com",
            Category::Science,
            "/img/science-1.jpg",
            28,
            true,
        ),
        entry(
            "A Brief History of Time",
            "Stephen Hawking",
            "stephen.hawking@authors.example.com",
            Category::Science,
            "/img/science-2.jpg",
            22,
            false,
        ),
        entry(
            "The Selfish Gene",
            "Richard Dawkins",
            "richard.dawkins@authors.example.com",
            Category::Science,
            "/img/science-3.jpg",
            21,
            false,
        ),
        entry(
            "Sapiens",
            "Yuval Noah Harari",
            "yuval.harari@authors.example.com",
            Category::History,
            "/img/history-1.jpg",
            30,
            true,
        ),
        entry(
            "Guns, Germs, and Steel",
            "Jared Diamond",
            "jared.diamond@authors.example.com",
            Category::History,
            "/img/history-2.jpg",
            26,
            false,
        ),
        entry(
            "The Diary of a Young Girl",
            "Anne Frank",
            "anne.frank@authors.example.com",
            Category::Biography,
            "/img/biography-1.jpg",
            14,
            false,
        ),
        entry(
            "Long Walk to Freedom",
            "Nelson Mandela",
            "nelson.mandela@authors.example.com",
            Category::Biography,
            "/img/biography-2.jpg",
            24,
            false,
        ),
        entry(
            "Thinking, Fast and Slow",
            "Daniel Kahneman",
            "daniel.kahneman@authors.example.com",
            Category::NonFiction,
            "/img/non-fiction-1.jpg",
            27,
            false,
        ),
        entry(
            "Silent Spring",
            "Rachel Carson",
            "rachel.carson@authors.example.com",
            Category::NonFiction,
            "/img/non-fiction-2.jpg",
            20,
            false,
        ),
    ]
}
