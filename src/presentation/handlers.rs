use crate::application::auth_service::AuthService;
use crate::application::shop_service::ShopService;
use crate::data::memory::{
    InMemoryCartRepository, InMemoryPaymentRepository, InMemoryProductRepository,
};
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::models::{NewCartItem, NewProduct, PaymentRequest, ProductUpdate};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the services
pub struct AppState {
    pub shop:
        ShopService<InMemoryProductRepository, InMemoryCartRepository, InMemoryPaymentRepository>,
    pub auth: Arc<AuthService<InMemoryUserRepository>>,
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// Shop API Error Types
#[derive(Error, Debug)]
pub enum ShopError {
    #[error("unauthorized access")]
    Unauthenticated,
    #[error("forbidden access")]
    Forbidden,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Product is out of stock")]
    OutOfStock,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Payment recorded but cart not cleared")]
    CheckoutIncomplete(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ShopError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ShopError::Unauthenticated => actix_web::http::StatusCode::UNAUTHORIZED,
            ShopError::Forbidden => actix_web::http::StatusCode::FORBIDDEN,
            ShopError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ShopError::OutOfStock => actix_web::http::StatusCode::BAD_REQUEST,
            ShopError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ShopError::CheckoutIncomplete(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Database(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            ShopError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        let error = match self {
            ShopError::CheckoutIncomplete(payment_id) => {
                Some(format!("payment {} recorded, cart left stale", payment_id))
            }
            ShopError::Database(cause) => Some(cause.clone()),
            ShopError::Internal(cause) => Some(cause.clone()),
            _ => None,
        };

        // Log error based on severity
        match self {
            ShopError::Unauthenticated => {
                warn!(error = %message, status = %status, "Unauthorized")
            }
            ShopError::Forbidden => {
                warn!(error = %message, status = %status, "Forbidden")
            }
            ShopError::NotFound(_) => {
                warn!(error = %message, status = %status, "Resource not found")
            }
            ShopError::OutOfStock => {
                warn!(error = %message, status = %status, "Out of stock")
            }
            ShopError::Validation(_) => {
                warn!(error = %message, status = %status, "Validation error")
            }
            ShopError::CheckoutIncomplete(payment_id) => {
                error!(payment_id = %payment_id, status = %status, "Checkout incomplete")
            }
            ShopError::Database(_) => {
                error!(error = %message, status = %status, "Database error")
            }
            ShopError::Internal(_) => {
                error!(error = %message, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(ErrorResponse { message, error })
    }
}

impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Unauthorized) => ShopError::Unauthenticated,
            Some(DomainError::Forbidden) => ShopError::Forbidden,
            Some(DomainError::OutOfStock) => ShopError::OutOfStock,
            Some(DomainError::NotFound(msg)) => ShopError::NotFound(msg.clone()),
            Some(DomainError::Validation(msg)) => ShopError::Validation(msg.clone()),
            Some(DomainError::CheckoutIncomplete(payment_id)) => {
                ShopError::CheckoutIncomplete(payment_id.clone())
            }
            Some(DomainError::Internal(msg)) => ShopError::Internal(msg.clone()),
            None => ShopError::Database(err.to_string()),
        }
    }
}

// Authentication gate: rejects with 401 unless JwtAuthMiddleware attached a
// verified identity. Cheap and stateless; the admin gate's directory read
// only ever happens after this has passed.
impl FromRequest for AuthenticatedUser {
    type Error = ShopError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move { user.ok_or(ShopError::Unauthenticated) })
    }
}

// Handlers

#[instrument]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok().body("Medicine shop is running")
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[derive(Serialize)]
struct StockResponse {
    message: String,
    packet: u32,
}

#[instrument(skip(state, user), fields(email = %user.email()))]
pub async fn create_product(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<NewProduct>,
) -> Result<HttpResponse, ShopError> {
    info!(name = %req.name, "Creating product");
    let product = state
        .shop
        .create_product(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create product");
            ShopError::from(e)
        })?;
    info!(product_id = %product.id, "Product created successfully");
    Ok(HttpResponse::Created().json(product))
}

#[instrument(skip(state))]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, ShopError> {
    let products = state.shop.list_products().await.map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(products))
}

#[instrument(skip(state), fields(product_id = %*path))]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let product = state.shop.get_product(&path).await.map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(skip(state, req), fields(product_id = %*path))]
pub async fn update_product(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ProductUpdate>,
) -> Result<HttpResponse, ShopError> {
    let product = state
        .shop
        .replace_product(&path, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update product");
            ShopError::from(e)
        })?;
    info!(product_id = %product.id, "Product updated");
    Ok(HttpResponse::Ok().json(product))
}

#[instrument(skip(state, user), fields(product_id = %*path, email = %user.email()))]
pub async fn delete_product(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    state
        .auth
        .require_admin(user.email())
        .await
        .map_err(ShopError::from)?;

    state.shop.delete_product(&path).await.map_err(ShopError::from)?;
    info!(product_id = %*path, "Product deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Product deleted successfully"
    })))
}

#[instrument(skip(state, user), fields(product_id = %*path, email = %user.email()))]
pub async fn increment_stock(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let product = state
        .shop
        .increment_stock(&path)
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(StockResponse {
        message: "Packet count updated successfully".to_string(),
        packet: product.packet,
    }))
}

#[instrument(skip(state, user), fields(product_id = %*path, email = %user.email()))]
pub async fn decrement_stock(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let product = state
        .shop
        .decrement_stock(&path)
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(StockResponse {
        message: "Packet count updated successfully".to_string(),
        packet: product.packet,
    }))
}

#[instrument(skip(state, user, req), fields(email = %user.email()))]
pub async fn add_cart_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<NewCartItem>,
) -> Result<HttpResponse, ShopError> {
    let item = state
        .shop
        .add_cart_item(req.into_inner())
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Created().json(item))
}

#[instrument(skip(state))]
pub async fn list_cart_items(state: web::Data<AppState>) -> Result<HttpResponse, ShopError> {
    let items = state.shop.list_cart_items().await.map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state), fields(email = %*path))]
pub async fn cart_items_by_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ShopError> {
    let items = state
        .shop
        .cart_items_for_email(&path)
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state, user, req), fields(email = %user.email()))]
pub async fn add_saved_item(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<NewCartItem>,
) -> Result<HttpResponse, ShopError> {
    let item = state
        .shop
        .add_saved_item(req.into_inner())
        .await
        .map_err(ShopError::from)?;
    Ok(HttpResponse::Created().json(item))
}

#[instrument(skip(state))]
pub async fn list_saved_items(state: web::Data<AppState>) -> Result<HttpResponse, ShopError> {
    let items = state.shop.list_saved_items().await.map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip(state, user, req), fields(email = %user.email(), user_id = %req.user_id))]
pub async fn submit_payment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<PaymentRequest>,
) -> Result<HttpResponse, ShopError> {
    info!(user_id = %req.user_id, amount = req.amount, "Processing payment");
    let receipt = state
        .shop
        .submit_payment(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Checkout failed");
            ShopError::from(e)
        })?;
    info!(
        payment_id = %receipt.payment.id,
        deleted_count = receipt.deleted_count,
        "Checkout completed successfully"
    );
    Ok(HttpResponse::Ok().json(receipt))
}

#[instrument(skip(state, user), fields(email = %user.email()))]
pub async fn list_payments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ShopError> {
    state
        .auth
        .require_admin(user.email())
        .await
        .map_err(ShopError::from)?;

    let payments = state.shop.list_payments().await.map_err(ShopError::from)?;
    Ok(HttpResponse::Ok().json(payments))
}
