use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unauthorized access")]
    Unauthorized,
    #[error("forbidden access")]
    Forbidden,
    #[error("Product is out of stock")]
    OutOfStock,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Payment recorded but cart not cleared: {0}")]
    CheckoutIncomplete(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
