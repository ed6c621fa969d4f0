use crate::domain::models::{CartItem, Payment, Product};
use crate::domain::repository::{CartRepository, PaymentRepository, ProductRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryProductRepository {
    storage: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: Product) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(product.id.clone(), product);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>> {
        let storage = self.storage.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn update(&self, product: Product) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(product.id.clone(), product);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(id).is_some())
    }
}

/// Backs both cart-like collections (`cards` and `cardAdd`); each gets its
/// own instance.
#[derive(Clone)]
pub struct InMemoryCartRepository {
    storage: Arc<RwLock<HashMap<String, CartItem>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCartRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn save(&self, item: CartItem) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(item.id.clone(), item);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<CartItem>> {
        let storage = self.storage.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<CartItem>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|item| item.email == email)
            .cloned()
            .collect())
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<u64> {
        let mut storage = self.storage.write().await;
        let before = storage.len();
        storage.retain(|_, item| item.user_id != user_id);
        Ok((before - storage.len()) as u64)
    }
}

#[derive(Clone)]
pub struct InMemoryPaymentRepository {
    storage: Arc<RwLock<Vec<Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryPaymentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: Payment) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.push(payment);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Payment>> {
        let storage = self.storage.read().await;
        Ok(storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_item(id: &str, user_id: &str, email: &str) -> CartItem {
        CartItem {
            id: id.to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
            product_id: "prod-1".to_string(),
            name: "Napa Extra".to_string(),
            price: 2.5,
        }
    }

    #[tokio::test]
    async fn test_delete_by_user_removes_only_that_users_items() {
        let repo = InMemoryCartRepository::new();
        repo.save(cart_item("c1", "u1", "u1@example.com"))
            .await
            .unwrap();
        repo.save(cart_item("c2", "u1", "u1@example.com"))
            .await
            .unwrap();
        repo.save(cart_item("c3", "u2", "u2@example.com"))
            .await
            .unwrap();

        let deleted = repo.delete_by_user("u1").await.unwrap();
        assert_eq!(deleted, 2);

        let remaining = repo.find_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, "u2");
    }

    #[tokio::test]
    async fn test_delete_by_user_with_no_items_deletes_nothing() {
        let repo = InMemoryCartRepository::new();
        repo.save(cart_item("c1", "u1", "u1@example.com"))
            .await
            .unwrap();

        let deleted = repo.delete_by_user("u9").await.unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_email_filters_items() {
        let repo = InMemoryCartRepository::new();
        repo.save(cart_item("c1", "u1", "a@example.com"))
            .await
            .unwrap();
        repo.save(cart_item("c2", "u2", "b@example.com"))
            .await
            .unwrap();

        let items = repo.find_by_email("a@example.com").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "c1");
    }

    #[tokio::test]
    async fn test_payments_are_append_only_and_keep_duplicates() {
        let repo = InMemoryPaymentRepository::new();
        let payment = Payment {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            amount: 10.0,
            items: vec!["prod-1".to_string()],
            date: "2024-06-01".to_string(),
        };

        repo.save(payment.clone()).await.unwrap();
        repo.save(payment).await.unwrap();

        // No dedup key: resubmission stores a second record
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_product_delete_reports_missing_id() {
        let repo = InMemoryProductRepository::new();
        assert!(!repo.delete("missing").await.unwrap());
    }
}
