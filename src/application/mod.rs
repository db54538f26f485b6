pub mod auth_service;
pub mod book_service;
pub mod seed;
pub mod user_service;
