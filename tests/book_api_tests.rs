use actix_web::{App, test, web};
use bookstore_api::application::auth_service::AuthService;
use bookstore_api::application::book_service::BookService;
use bookstore_api::application::user_service::UserService;
use bookstore_api::data::book_repository::InMemoryBookRepository;
use bookstore_api::data::user_repository::InMemoryUserRepository;
use bookstore_api::presentation::configure;
use bookstore_api::presentation::handlers::AppState;
use std::sync::Arc;

macro_rules! setup_book_test {
    () => {{
        let book_repository = Arc::new(InMemoryBookRepository::new());
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let jwt_secret = "test-secret-key-for-book-tests".to_string();

        let state = web::Data::new(AppState {
            book_service: BookService::new(book_repository.clone(), user_repository.clone()),
            user_service: UserService::new(user_repository.clone(), book_repository),
            auth_service: Arc::new(AuthService::new(user_repository, jwt_secret)),
        });

        test::init_service(App::new().app_data(state.clone()).configure(configure)).await
    }};
}

// Registers an editor account and logs in, returning a bearer token for
// the protected book routes.
macro_rules! editor_token {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(serde_json::json!({
                "email": "editor@example.com",
                "name": "Catalog Editor",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({
                "email": "editor@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["token"].as_str().unwrap().to_string()
    }};
}

macro_rules! create_book {
    ($app:expr, $token:expr, $payload:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/books")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json($payload)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body
    }};
}

fn book_payload(title: &str, category: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "author": "Frank Herbert",
        "authorEmail": "frank.herbert@example.com",
        "category": category
    })
}

#[actix_web::test]
async fn test_list_books_empty_catalog() {
    let app = setup_book_test!();

    let req = test::TestRequest::get().uri("/api/books").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
    assert!(body.get("category").is_none());
    assert!(body.get("query").is_none());
}

#[actix_web::test]
async fn test_create_book_requires_token() {
    let app = setup_book_test!();

    let req = test::TestRequest::post()
        .uri("/api/books")
        .set_json(book_payload("Dune", "fiction"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Authentication token required");
}

#[actix_web::test]
async fn test_create_book_rejects_invalid_token() {
    let app = setup_book_test!();

    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .set_json(book_payload("Dune", "fiction"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid or expired token");
}

#[actix_web::test]
async fn test_create_and_fetch_book() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let body = create_book!(app, token, book_payload("Dune", "fiction"));
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Book created successfully");
    assert_eq!(body["data"]["title"], "Dune");
    assert_eq!(body["data"]["category"], "fiction");
    // Defaults applied when the payload omits them
    assert_eq!(body["data"]["price"], 0);
    assert_eq!(body["data"]["featured"], false);
    assert_eq!(body["data"]["cover"], "/img/fiction-1.jpg");
    // Embedded author carries no credential material
    assert_eq!(body["data"]["author"]["name"], "Frank Herbert");
    assert!(body["data"]["author"].get("password").is_none());
    assert!(body["data"]["author"].get("passwordHash").is_none());

    let id = body["data"]["id"].as_u64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Dune");
    assert_eq!(body["data"]["author"]["email"], "frank.herbert@example.com");
}

#[actix_web::test]
async fn test_create_book_collects_all_schema_issues() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    let issues = body["error"].as_array().unwrap();
    let fields: Vec<&str> = issues
        .iter()
        .map(|issue| issue["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "authorName", "authorEmail"]);
    for issue in issues {
        assert_eq!(issue["message"], "Required");
    }
}

#[actix_web::test]
async fn test_create_book_rejects_unknown_category() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(book_payload("Dune", "cooking"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let issues = body["error"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["field"], "category");
    assert_eq!(
        issues[0]["message"],
        "Must be one of: fiction, science, history, biography, non-fiction"
    );
}

#[actix_web::test]
async fn test_duplicate_title_is_a_conflict() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    create_book!(app, token, book_payload("Dune", "fiction"));

    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(book_payload("Dune", "fiction"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "A book with this title already exists");
}

#[actix_web::test]
async fn test_category_listing_excludes_featured_books() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    create_book!(app, token, book_payload("Dune", "fiction"));
    create_book!(
        app,
        token,
        serde_json::json!({
            "title": "1984",
            "authorName": "George Orwell",
            "authorEmail": "george.orwell@example.com",
            "category": "fiction",
            "featured": true
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/books/category/fiction")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["category"], "fiction");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Dune");

    let req = test::TestRequest::get().uri("/api/books/featured").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "1984");

    // The full listing still carries both
    let req = test::TestRequest::get().uri("/api/books").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
}

#[actix_web::test]
async fn test_unknown_category_returns_empty_list() {
    let app = setup_book_test!();

    let req = test::TestRequest::get()
        .uri("/api/books/category/cooking")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["category"], "cooking");
}

#[actix_web::test]
async fn test_search_matches_title_and_echoes_query() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    create_book!(app, token, book_payload("Dune", "fiction"));
    create_book!(
        app,
        token,
        serde_json::json!({
            "title": "Cosmos",
            "authorName": "Carl Sagan",
            "authorEmail": "carl.sagan@example.com",
            "category": "science"
        })
    );

    let req = test::TestRequest::get()
        .uri("/api/books/search?q=dune")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["query"], "dune");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Dune");

    // Author names match too
    let req = test::TestRequest::get()
        .uri("/api/books/search?q=sagan")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["title"], "Cosmos");
}

#[actix_web::test]
async fn test_search_without_query_lists_everything() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    create_book!(app, token, book_payload("Dune", "fiction"));
    create_book!(
        app,
        token,
        serde_json::json!({
            "title": "Cosmos",
            "authorName": "Carl Sagan",
            "authorEmail": "carl.sagan@example.com",
            "category": "science"
        })
    );

    let req = test::TestRequest::get().uri("/api/books/search").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["query"], "");
}

#[actix_web::test]
async fn test_get_book_not_found() {
    let app = setup_book_test!();

    let req = test::TestRequest::get().uri("/api/books/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Book not found");
}

#[actix_web::test]
async fn test_non_numeric_book_id_is_a_bad_request() {
    let app = setup_book_test!();

    let req = test::TestRequest::get()
        .uri("/api/books/not-a-number")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid path parameter")
    );
}

#[actix_web::test]
async fn test_update_book_changes_fields() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let body = create_book!(app, token, book_payload("Dune", "fiction"));
    let id = body["data"]["id"].as_u64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/books/{}", id))
        .set_json(serde_json::json!({ "price": 25, "featured": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Book updated successfully");
    assert_eq!(body["data"]["price"], 25);
    assert_eq!(body["data"]["featured"], true);
    assert_eq!(body["data"]["title"], "Dune");
}

#[actix_web::test]
async fn test_update_unknown_book_not_found() {
    let app = setup_book_test!();

    let req = test::TestRequest::put()
        .uri("/api/books/999")
        .set_json(serde_json::json!({ "price": 25 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Book not found or invalid author id");
}

#[actix_web::test]
async fn test_update_rejects_wrong_field_types() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let body = create_book!(app, token, book_payload("Dune", "fiction"));
    let id = body["data"]["id"].as_u64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/books/{}", id))
        .set_json(serde_json::json!({ "title": 123 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let issues = body["error"].as_array().unwrap();
    assert_eq!(issues[0]["field"], "title");
    assert_eq!(issues[0]["message"], "Expected string, received integer");
}

#[actix_web::test]
async fn test_delete_then_get_is_not_found() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let body = create_book!(app, token, book_payload("Dune", "fiction"));
    let id = body["data"]["id"].as_u64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/books/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Book deleted successfully");
    assert_eq!(body["data"]["title"], "Dune");

    let req = test::TestRequest::get()
        .uri(&format!("/api/books/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_repeated_author_email_reuses_the_author() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let first = create_book!(app, token, book_payload("Dune", "fiction"));
    let second = create_book!(app, token, book_payload("Dune Messiah", "fiction"));

    assert_eq!(first["data"]["authorId"], second["data"]["authorId"]);

    // Editor plus one auto-created author
    let req = test::TestRequest::get().uri("/api/users").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
}

#[actix_web::test]
async fn test_malformed_json_body_is_a_bad_request() {
    let app = setup_book_test!();
    let token = editor_token!(app);

    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON payload")
    );
}
