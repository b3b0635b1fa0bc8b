use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{App, test, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use pushkind_blog::repository::{CategoryListQuery, CategoryReader, DieselRepository};
use pushkind_blog::routes;
use pushkind_blog::services::passwords::hash_password;
use tera::Tera;

mod common;

macro_rules! init_app {
    ($repo:expr) => {{
        let key = Key::generate();
        let tera = Tera::new("templates/**/*").expect("templates should parse");
        test::init_service(
            App::new()
                .wrap(
                    FlashMessagesFramework::builder(
                        CookieMessageStore::builder(key.clone()).build(),
                    )
                    .build(),
                )
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($repo.clone()))
                .app_data(web::Data::new(tera))
                .configure(routes::configure),
        )
        .await
    }};
}

fn category_count(repo: &DieselRepository) -> usize {
    repo.list_categories(CategoryListQuery::default())
        .expect("should list categories")
        .0
}

fn location<B>(resp: &actix_web::dev::ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn cookies<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Vec<Cookie<'static>> {
    resp.response()
        .cookies()
        .map(|c| c.into_owned())
        .collect()
}

fn seed_admin(repo: &DieselRepository) {
    let hash = hash_password("admin_password").expect("should hash");
    common::create_user_with_hash(repo, "johndoe", "admin@admin.com", hash.as_str(), true);
    common::create_category(repo, "Category1");
}

#[actix_web::test]
async fn admin_creates_category_and_duplicates_are_rejected() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_admin(&repo);
    let app = init_app!(repo);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "admin@admin.com"), ("password", "admin_password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/users/"));
    let session_cookies = cookies(&resp);

    let mut req = test::TestRequest::post()
        .uri("/categories")
        .set_form([("name", "Category2")]);
    for cookie in &session_cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/categories");
    assert_eq!(category_count(&repo), 2);

    let mut req = test::TestRequest::post()
        .uri("/categories")
        .set_form([("name", "Category2")]);
    for cookie in &session_cookies {
        req = req.cookie(cookie.clone());
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("error(s)"));
    assert!(body.contains("Name has already been taken"));
    assert_eq!(category_count(&repo), 2);
}

#[actix_web::test]
async fn anonymous_cannot_create_category() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_admin(&repo);
    let app = init_app!(repo);

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_form([("name", "Category2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/categories");
    assert_eq!(category_count(&repo), 1);
}

#[actix_web::test]
async fn failed_login_rerenders_with_generic_warning() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_admin(&repo);
    let app = init_app!(repo);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form([("email", "admin@admin.com"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Login was not successful."));
}

#[actix_web::test]
async fn signup_logs_in_and_unlocks_article_form() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let app = init_app!(repo);

    let req = test::TestRequest::get().uri("/articles/new").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    let req = test::TestRequest::post()
        .uri("/users")
        .set_form([
            ("username", "janedoe"),
            ("email", "Jane@Example.com"),
            ("password", "secret"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/articles");

    let mut req = test::TestRequest::get().uri("/articles/new");
    for cookie in cookies(&resp) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn invalid_signup_shows_every_error() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let app = init_app!(repo);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_form([("username", "jo"), ("email", "nope"), ("password", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("error(s)"));
    assert!(body.contains("Username must be between 3 and 25 characters"));
    assert!(body.contains("Email is invalid"));
}

#[actix_web::test]
async fn missing_resources_are_not_found() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    let app = init_app!(repo);

    for uri in ["/articles/999", "/categories/999", "/users/999"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn public_pages_render() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_admin(&repo);
    let app = init_app!(repo);

    for uri in ["/", "/about", "/articles", "/categories", "/users", "/login", "/signup"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn huge_page_numbers_render_an_empty_listing() {
    let test_db = common::TestDb::new();
    let repo = test_db.repository();
    seed_admin(&repo);
    let app = init_app!(repo);

    for uri in [
        "/articles?page=18446744073709551615",
        "/categories?page=18446744073709551615",
        "/users?page=18446744073709551615",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = test::read_body(resp).await;
        let body = String::from_utf8_lossy(&body);
        assert!(!body.contains("href=\"/categories/1\""), "{uri}");
        assert!(!body.contains("href=\"/users/1\""), "{uri}");
    }
}
