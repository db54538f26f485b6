use std::collections::BTreeMap;

use crate::domain::book::{BookWithAuthor, Category};

/// Catalog view state, reduced one [`CatalogAction`] at a time.
///
/// The featured strip duplicates entries that also live on their category
/// shelf, so aggregate selectors skip it to avoid double counting.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub shelves: BTreeMap<Category, Vec<BookWithAuthor>>,
    pub featured: Vec<BookWithAuthor>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_query: String,
    pub page: String,
    pub next_id: u32,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            shelves: BTreeMap::new(),
            featured: Vec::new(),
            loading: false,
            error: None,
            search_query: String::new(),
            page: String::from("home"),
            next_id: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    SetLoading(bool),
    SetError(Option<String>),
    SetBooks {
        shelves: BTreeMap<Category, Vec<BookWithAuthor>>,
        featured: Vec<BookWithAuthor>,
    },
    AddBook(BookWithAuthor),
    RemoveBook(u32),
    SetSearchQuery(String),
    SetPage(String),
    SetNextId(u32),
}

/// Applies one action and returns the next state. The previous state is
/// consumed; callers that need history keep a clone.
pub fn reduce(state: CatalogState, action: CatalogAction) -> CatalogState {
    match action {
        CatalogAction::SetLoading(loading) => CatalogState { loading, ..state },
        CatalogAction::SetError(error) => CatalogState {
            error,
            loading: false,
            ..state
        },
        CatalogAction::SetBooks { shelves, featured } => CatalogState {
            shelves,
            featured,
            loading: false,
            error: None,
            ..state
        },
        CatalogAction::AddBook(book) => {
            let mut state = state;
            if book.featured {
                state.featured.push(book.clone());
            }
            state.shelves.entry(book.category).or_default().push(book);
            state.next_id += 1;
            state
        }
        // Ids are unique across the catalog, so removal sweeps every shelf
        // and the featured strip in one pass.
        CatalogAction::RemoveBook(id) => {
            let mut state = state;
            for shelf in state.shelves.values_mut() {
                shelf.retain(|book| book.id != id);
            }
            state.featured.retain(|book| book.id != id);
            state
        }
        CatalogAction::SetSearchQuery(search_query) => CatalogState {
            search_query,
            ..state
        },
        CatalogAction::SetPage(page) => CatalogState { page, ..state },
        CatalogAction::SetNextId(next_id) => CatalogState { next_id, ..state },
    }
}

impl CatalogState {
    /// Every shelved book in shelf order, featured strip excluded.
    pub fn all_books(&self) -> Vec<&BookWithAuthor> {
        self.shelves.values().flatten().collect()
    }

    /// Case- and accent-insensitive match over title, author name and
    /// category. A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&BookWithAuthor> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.all_books();
        }

        let needle = normalize(trimmed);
        self.all_books()
            .into_iter()
            .filter(|book| {
                normalize(&book.title).contains(&needle)
                    || normalize(&book.author.name).contains(&needle)
                    || normalize(book.category.as_str()).contains(&needle)
            })
            .collect()
    }

    pub fn books_by_category(&self, category: Category) -> &[BookWithAuthor] {
        self.shelves
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn stats(&self) -> CatalogStats {
        let by_category: BTreeMap<Category, usize> = Category::ALL
            .iter()
            .map(|&category| (category, self.books_by_category(category).len()))
            .collect();
        CatalogStats {
            total: by_category.values().sum(),
            featured: self.featured.len(),
            by_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub featured: usize,
    pub by_category: BTreeMap<Category, usize>,
}

/// Lowercases and folds common accented letters so "García" matches
/// "garcia".
fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            c => c,
        })
        .collect()
}
