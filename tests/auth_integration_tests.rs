use actix_web::{App, test, web};
use medi_shop_api::application::auth_service::{AuthService, RegisterOutcome};
use medi_shop_api::application::shop_service::ShopService;
use medi_shop_api::data::memory::{
    InMemoryCartRepository, InMemoryPaymentRepository, InMemoryProductRepository,
};
use medi_shop_api::data::user_repository::InMemoryUserRepository;
use medi_shop_api::domain::user::{RegisterUser, TokenRequest};
use medi_shop_api::presentation::auth::{
    admin_status, delete_user, issue_token, list_users, promote_admin, register,
};
use medi_shop_api::presentation::handlers::AppState;
use medi_shop_api::presentation::middleware::JwtAuthMiddleware;
use std::sync::Arc;

const TEST_SECRET: &str = "test-secret-key-for-auth-tests";

fn token_request(email: &str) -> TokenRequest {
    TokenRequest {
        email: email.to_string(),
        extra: serde_json::Map::new(),
    }
}

fn register_request(email: &str) -> RegisterUser {
    RegisterUser {
        email: email.to_string(),
        name: "Test User".to_string(),
        photo: None,
    }
}

/// Registers `admin@example.com` (promoted) and `customer@example.com`, and
/// yields the app plus a token for each.
macro_rules! setup_auth_test {
    () => {{
        let users = Arc::new(InMemoryUserRepository::new());
        let auth = Arc::new(AuthService::new(users, TEST_SECRET.to_string()));
        let shop = ShopService::new(
            Arc::new(InMemoryProductRepository::new()),
            Arc::new(InMemoryCartRepository::new()),
            Arc::new(InMemoryCartRepository::new()),
            Arc::new(InMemoryPaymentRepository::new()),
        );

        let outcome = auth
            .register_user(register_request("admin@example.com"))
            .await
            .unwrap();
        let RegisterOutcome::Created(admin_user) = outcome else {
            panic!("expected admin creation");
        };
        auth.promote_to_admin(&admin_user.id).await.unwrap();

        auth.register_user(register_request("customer@example.com"))
            .await
            .unwrap();

        let admin_token = auth.issue_token(&token_request("admin@example.com")).unwrap();
        let customer_token = auth
            .issue_token(&token_request("customer@example.com"))
            .unwrap();

        let state = web::Data::new(AppState { shop, auth });

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(TEST_SECRET.to_string()))
                .route("/jwt", web::post().to(issue_token))
                .route("/users", web::post().to(register))
                .route("/users", web::get().to(list_users))
                .route("/users/admin/{email}", web::get().to(admin_status))
                .route("/users/admin/{id}", web::patch().to(promote_admin))
                .route("/users/{id}", web::delete().to(delete_user)),
        )
        .await;

        (app, state, admin_token, customer_token)
    }};
}

#[actix_web::test]
async fn test_jwt_issuance_returns_signed_token() {
    let (app, _state, _admin, _customer) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(serde_json::json!({
            "email": "anyone@example.com",
            "name": "Anyone"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[actix_web::test]
async fn test_register_duplicate_email_reports_without_insert() {
    let (app, _state, _admin, _customer) = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(serde_json::json!({
            "email": "new@example.com",
            "name": "New User"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["insertId"].as_str().is_some());

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(serde_json::json!({
            "email": "new@example.com",
            "name": "Impostor"
        }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "user already exists");
    assert!(body["insertId"].is_null());

    // Still exactly one user with that email
    let req = test::TestRequest::get().uri("/users").to_request();
    let users: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let count = users
        .as_array()
        .unwrap()
        .iter()
        .filter(|u| u["email"] == "new@example.com")
        .count();
    assert_eq!(count, 1);
}

#[actix_web::test]
async fn test_admin_status_requires_token() {
    let (app, _state, _admin, _customer) = setup_auth_test!();

    let req = test::TestRequest::get()
        .uri("/users/admin/customer@example.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_admin_status_rejects_garbage_token() {
    let (app, _state, _admin, _customer) = setup_auth_test!();

    let req = test::TestRequest::get()
        .uri("/users/admin/customer@example.com")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_admin_status_for_own_email() {
    let (app, _state, admin_token, customer_token) = setup_auth_test!();

    let req = test::TestRequest::get()
        .uri("/users/admin/admin@example.com")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admin"], true);

    let req = test::TestRequest::get()
        .uri("/users/admin/customer@example.com")
        .insert_header(("Authorization", format!("Bearer {}", customer_token)))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["admin"], false);
}

#[actix_web::test]
async fn test_admin_status_for_another_email_is_forbidden() {
    let (app, _state, _admin, customer_token) = setup_auth_test!();

    // The target email belongs to an actual admin; the mismatch alone
    // forbids the lookup.
    let req = test::TestRequest::get()
        .uri("/users/admin/admin@example.com")
        .insert_header(("Authorization", format!("Bearer {}", customer_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn test_delete_user_forbidden_for_non_admin() {
    let (app, state, _admin, customer_token) = setup_auth_test!();

    let users = state.auth.list_users().await.unwrap();
    let target = users
        .iter()
        .find(|u| u.email == "admin@example.com")
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}", target.id))
        .insert_header(("Authorization", format!("Bearer {}", customer_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Nothing was deleted
    assert_eq!(state.auth.list_users().await.unwrap().len(), 2);
}

#[actix_web::test]
async fn test_delete_user_as_admin() {
    let (app, state, admin_token, _customer) = setup_auth_test!();

    let users = state.auth.list_users().await.unwrap();
    let target = users
        .iter()
        .find(|u| u.email == "customer@example.com")
        .unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/users/{}", target.id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(state.auth.list_users().await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_delete_missing_user_is_not_found() {
    let (app, _state, admin_token, _customer) = setup_auth_test!();

    let req = test::TestRequest::delete()
        .uri("/users/no-such-id")
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_promote_admin_requires_admin() {
    let (app, state, admin_token, customer_token) = setup_auth_test!();

    let users = state.auth.list_users().await.unwrap();
    let target = users
        .iter()
        .find(|u| u.email == "customer@example.com")
        .unwrap()
        .clone();

    // A customer cannot promote anyone (not even themselves)
    let req = test::TestRequest::patch()
        .uri(&format!("/users/admin/{}", target.id))
        .insert_header(("Authorization", format!("Bearer {}", customer_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // An admin can
    let req = test::TestRequest::patch()
        .uri(&format!("/users/admin/{}", target.id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    assert!(state.auth.admin_status("customer@example.com").await.unwrap());
}

#[actix_web::test]
async fn test_promote_admin_requires_token() {
    let (app, _state, _admin, _customer) = setup_auth_test!();

    let req = test::TestRequest::patch()
        .uri("/users/admin/some-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
