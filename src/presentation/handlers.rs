use crate::application::auth_service::{AuthService, AuthenticatedUser};
use crate::application::book_service::BookService;
use crate::application::user_service::UserService;
use crate::data::book_repository::InMemoryBookRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::book::{CreateBook, UpdateBook};
use crate::domain::error::DomainError;
use crate::validation::{ValidationError, parse_payload, schemas};
use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

// AppState holding the services
pub struct AppState {
    pub book_service: BookService<InMemoryBookRepository, InMemoryUserRepository>,
    pub user_service: UserService<InMemoryUserRepository, InMemoryBookRepository>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform success envelopes
#[derive(Serialize)]
pub struct ListResponse<T> {
    success: bool,
    data: Vec<T>,
    total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            total: data.len(),
            data,
            category: None,
            query: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }
}

#[derive(Serialize)]
pub struct ItemResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

// Uniform error envelope; `error` is a message string, or the issue
// list for schema failures.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: Value,
}

// Bookstore API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(ValidationError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => actix_web::http::StatusCode::CONFLICT,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        // Log error based on severity
        match self {
            ApiError::Validation(err) => {
                warn!(issues = err.issues.len(), status = %status, "Request failed validation")
            }
            ApiError::BadRequest(_) => {
                warn!(error = %error_msg, status = %status, "Bad request")
            }
            ApiError::Unauthorized(_) => {
                warn!(error = %error_msg, status = %status, "Unauthorized")
            }
            ApiError::NotFound(_) => {
                warn!(error = %error_msg, status = %status, "Resource not found")
            }
            ApiError::Conflict(_) => {
                warn!(error = %error_msg, status = %status, "Conflict")
            }
            ApiError::Internal(detail) => {
                // The detail stays in the logs; clients get a generic message.
                error!(detail = %detail, status = %status, "Internal error")
            }
        }

        let error = match self {
            ApiError::Validation(err) => serde_json::json!(err.issues),
            _ => Value::String(error_msg),
        };

        HttpResponse::build(status).json(ErrorResponse {
            success: false,
            error,
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::BadRequest(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::InvalidCredentials) => {
                ApiError::Unauthorized(DomainError::InvalidCredentials.to_string())
            }
            Some(DomainError::Configuration) => ApiError::Internal(err.to_string()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

/// Folds malformed request bodies into the shared error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON payload: {}", err)).into()
}

pub fn path_error_handler(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument]
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "Bookstore API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "books": "/api/books",
            "booksByCategory": "/api/books/category/{category}",
            "featuredBooks": "/api/books/featured",
            "searchBooks": "/api/books/search?q=",
            "users": "/api/users",
            "login": "/api/auth/login",
            "health": "/api/health"
        }
    }))
}

#[instrument(skip(state))]
pub async fn list_books(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let books = state.book_service.list_books().await?;
    info!(total = books.len(), "Books listed");
    Ok(HttpResponse::Ok().json(ListResponse::new(books)))
}

#[instrument(skip(state), fields(category = %*path))]
pub async fn list_books_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let category = path.into_inner();
    let books = state.book_service.list_books_by_category(&category).await?;
    info!(total = books.len(), "Category listed");
    Ok(HttpResponse::Ok().json(ListResponse::new(books).with_category(&category)))
}

#[instrument(skip(state))]
pub async fn list_featured_books(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let books = state.book_service.list_featured_books().await?;
    info!(total = books.len(), "Featured books listed");
    Ok(HttpResponse::Ok().json(ListResponse::new(books)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[instrument(skip(state, search), fields(query))]
pub async fn search_books(
    state: web::Data<AppState>,
    search: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = search.into_inner().q.unwrap_or_default();
    tracing::Span::current().record("query", query.as_str());
    let books = state.book_service.search_books(&query).await?;
    info!(total = books.len(), "Search completed");
    Ok(HttpResponse::Ok().json(ListResponse::new(books).with_query(&query)))
}

#[instrument(skip(state), fields(book_id = %*path))]
pub async fn get_book(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let book = state.book_service.get_book(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::new(book)))
}

#[instrument(skip(state, payload), fields(created_by))]
pub async fn create_book(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    debug!(schema = schemas::CREATE_BOOK.name, "Validating payload");
    let req: CreateBook = parse_payload(&schemas::CREATE_BOOK, payload.into_inner())?;
    tracing::Span::current().record("created_by", user.user_id);
    info!(title = %req.title, "Creating book");
    let book = state.book_service.create_book(req).await.map_err(|e| {
        error!(error = %e, "Failed to create book");
        ApiError::from(e)
    })?;
    info!(book_id = book.id, "Book created successfully");
    Ok(HttpResponse::Created()
        .json(ItemResponse::new(book).with_message("Book created successfully")))
}

#[instrument(skip(state, payload), fields(book_id = %*path))]
pub async fn update_book(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    debug!(schema = schemas::UPDATE_BOOK.name, "Validating payload");
    let req: UpdateBook = parse_payload(&schemas::UPDATE_BOOK, payload.into_inner())?;
    let book = state
        .book_service
        .update_book(path.into_inner(), req)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update book");
            ApiError::from(e)
        })?;
    info!(book_id = book.id, "Book updated successfully");
    Ok(HttpResponse::Ok().json(ItemResponse::new(book).with_message("Book updated successfully")))
}

#[instrument(skip(state), fields(book_id = %*path))]
pub async fn delete_book(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let book = state
        .book_service
        .delete_book(path.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to delete book");
            ApiError::from(e)
        })?;
    info!(book_id = book.id, "Book deleted successfully");
    Ok(HttpResponse::Ok().json(ItemResponse::new(book).with_message("Book deleted successfully")))
}
