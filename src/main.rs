use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use bookstore_api::application::auth_service::AuthService;
use bookstore_api::application::book_service::BookService;
use bookstore_api::application::seed::seed_catalog;
use bookstore_api::application::user_service::UserService;
use bookstore_api::data::book_repository::InMemoryBookRepository;
use bookstore_api::data::user_repository::InMemoryUserRepository;
use bookstore_api::infrastructure::config::AppConfig;
use bookstore_api::infrastructure::logging::init_logging;
use bookstore_api::presentation;
use bookstore_api::presentation::handlers::AppState;
use bookstore_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[tokio::main]
#[instrument]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    init_logging();
    info!("Logging initialized successfully");

    let config = AppConfig::from_env();
    if config.jwt_secret.is_empty() {
        warn!("JWT_SECRET is not set; login will fail until it is configured");
    }

    info!("Creating in-memory repositories");
    let book_repository = Arc::new(InMemoryBookRepository::new());
    let user_repository = Arc::new(InMemoryUserRepository::new());

    info!("Creating services");
    let book_service = BookService::new(book_repository.clone(), user_repository.clone());
    let user_service = UserService::new(user_repository.clone(), book_repository.clone());
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        config.jwt_secret.clone(),
    ));

    info!("Seeding starter catalog");
    seed_catalog(&book_service).await;

    info!("Initializing application state");
    let state = web::Data::new(AppState {
        book_service,
        user_service,
        auth_service,
    });

    let frontend_url = config.frontend_url.clone();
    info!(origin = %frontend_url, "Configuring HTTP server");
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();
        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(presentation::configure)
    });

    let bind_addr = format!("{}:{}", config.host, config.port);
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind((config.host.as_str(), config.port))?;

    info!(
        address = %bind_addr,
        routes = %"GET /, GET /api/health, /api/books, /api/books/category/{category}, /api/books/featured, /api/books/search, /api/users, POST /api/auth/login",
        "Starting HTTP server"
    );
    server.run().await
}
