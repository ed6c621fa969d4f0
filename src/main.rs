use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use medi_shop_api::application::auth_service::AuthService;
use medi_shop_api::application::shop_service::ShopService;
use medi_shop_api::data::memory::{
    InMemoryCartRepository, InMemoryPaymentRepository, InMemoryProductRepository,
};
use medi_shop_api::data::user_repository::InMemoryUserRepository;
use medi_shop_api::infrastructure::logging::init_logging;
use medi_shop_api::presentation::auth::{
    admin_status, delete_user, issue_token, list_users, promote_admin, register,
};
use medi_shop_api::presentation::handlers::{
    AppState, add_cart_item, add_saved_item, cart_items_by_email, create_product, decrement_stock,
    delete_product, get_product, health_check, increment_stock, index, list_cart_items,
    list_payments, list_products, list_saved_items, submit_payment, update_product,
};
use medi_shop_api::presentation::middleware::{JwtAuthMiddleware, RequestLogMiddleware};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    // The signing secret is the one piece of required configuration; refuse
    // to start without it rather than serve unverifiable tokens.
    let jwt_secret = std::env::var("ACCESS_TOKEN_SECRET")
        .map_err(|_| std::io::Error::other("ACCESS_TOKEN_SECRET must be set"))?;

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    info!("Creating in-memory repositories");
    let users = Arc::new(InMemoryUserRepository::new());
    let products = Arc::new(InMemoryProductRepository::new());
    let carts = Arc::new(InMemoryCartRepository::new());
    let saved_items = Arc::new(InMemoryCartRepository::new());
    let payments = Arc::new(InMemoryPaymentRepository::new());

    let auth = Arc::new(AuthService::new(users, jwt_secret.clone()));
    let shop = ShopService::new(products, carts, saved_items, payments);

    let state = web::Data::new(AppState { shop, auth });

    info!(port = port, "Starting medicine shop API");
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:5174")
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(RequestLogMiddleware)
            .wrap(cors)
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health_check))
            .route("/jwt", web::post().to(issue_token))
            .route("/users", web::post().to(register))
            .route("/users", web::get().to(list_users))
            .route("/users/admin/{email}", web::get().to(admin_status))
            .route("/users/admin/{id}", web::patch().to(promote_admin))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/products", web::post().to(create_product))
            .route("/products", web::get().to(list_products))
            .route("/products/{id}", web::get().to(get_product))
            .route("/products/{id}", web::patch().to(update_product))
            .route("/products/{id}", web::delete().to(delete_product))
            .route("/products/{id}/increment", web::patch().to(increment_stock))
            .route("/products/{id}/decrement", web::patch().to(decrement_stock))
            .route("/cards", web::post().to(add_cart_item))
            .route("/cards", web::get().to(list_cart_items))
            .route("/cards/{email}", web::get().to(cart_items_by_email))
            .route("/cardAdd", web::post().to(add_saved_item))
            .route("/cardAdd", web::get().to(list_saved_items))
            .route("/payments", web::post().to(submit_payment))
            .route("/payments", web::get().to(list_payments))
    });

    let server = server.bind(("0.0.0.0", port))?;
    info!(port = port, "Server bound successfully");
    server.run().await
}
