pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod users;

use actix_web::web;

/// Route table plus body/path error handling, shared by the binary and
/// the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(handlers::path_error_handler))
        .route("/", web::get().to(handlers::api_index))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health_check))
                .service(
                    web::scope("/books")
                        // Literal segments come before `{id}` so `featured`
                        // and `search` are never captured as ids.
                        .route("", web::get().to(handlers::list_books))
                        .route(
                            "/category/{category}",
                            web::get().to(handlers::list_books_by_category),
                        )
                        .route("/featured", web::get().to(handlers::list_featured_books))
                        .route("/search", web::get().to(handlers::search_books))
                        .route("/{id}", web::get().to(handlers::get_book))
                        .route("", web::post().to(handlers::create_book))
                        .route("/{id}", web::put().to(handlers::update_book))
                        .route("/{id}", web::delete().to(handlers::delete_book)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::list_users))
                        .route("/{id}", web::get().to(users::get_user))
                        .route("", web::post().to(users::create_user))
                        .route("/{id}", web::put().to(users::update_user))
                        .route("/{id}", web::delete().to(users::delete_user)),
                )
                .service(web::scope("/auth").route("/login", web::post().to(auth::login))),
        );
}
