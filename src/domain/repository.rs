use crate::domain::models::{CartItem, Payment, Product};
use crate::domain::user::{Role, User};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_all_users(&self) -> Result<Vec<User>>;
    /// Returns false when no user with that id exists.
    async fn set_role(&self, id: &str, role: Role) -> Result<bool>;
    async fn delete_user(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn save(&self, product: Product) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>>;
    async fn find_all(&self) -> Result<Vec<Product>>;
    async fn update(&self, product: Product) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn save(&self, item: CartItem) -> Result<()>;
    async fn find_all(&self) -> Result<Vec<CartItem>>;
    async fn find_by_email(&self, email: &str) -> Result<Vec<CartItem>>;
    /// Removes every item owned by the user; returns how many were deleted.
    async fn delete_by_user(&self, user_id: &str) -> Result<u64>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: Payment) -> Result<()>;
    async fn find_all(&self) -> Result<Vec<Payment>>;
}
