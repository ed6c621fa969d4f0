use crate::domain::error::DomainError;
use crate::domain::models::{
    CartItem, CheckoutReceipt, NewCartItem, NewProduct, Payment, PaymentRequest, Product,
    ProductUpdate,
};
use crate::domain::repository::{CartRepository, PaymentRepository, ProductRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Catalog, carts and the checkout coordinator. `carts` is the collection
/// cleared on checkout; `saved_items` is the secondary `cardAdd` collection
/// and is never touched by a payment.
pub struct ShopService<P, C, Y>
where
    P: ProductRepository,
    C: CartRepository,
    Y: PaymentRepository,
{
    products: Arc<P>,
    carts: Arc<C>,
    saved_items: Arc<C>,
    payments: Arc<Y>,
}

impl<P, C, Y> ShopService<P, C, Y>
where
    P: ProductRepository,
    C: CartRepository,
    Y: PaymentRepository,
{
    pub fn new(products: Arc<P>, carts: Arc<C>, saved_items: Arc<C>, payments: Arc<Y>) -> Self {
        Self {
            products,
            carts,
            saved_items,
            payments,
        }
    }

    pub async fn create_product(&self, req: NewProduct) -> Result<Product> {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            company: req.company,
            price: req.price,
            original_price: req.original_price,
            discount: req.discount,
            doses: req.doses,
            description: req.description,
            image: req.image,
            capsule_info: req.capsule_info,
            packet: req.packet,
        };
        self.products.save(product.clone()).await?;
        Ok(product)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.products.find_all().await
    }

    pub async fn get_product(&self, id: &str) -> Result<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()).into())
    }

    /// Full field replacement. The stock counter is carried over untouched;
    /// only the increment/decrement operations move it.
    pub async fn replace_product(&self, id: &str, req: ProductUpdate) -> Result<Product> {
        let existing = self.get_product(id).await?;
        let product = Product {
            id: existing.id,
            name: req.name,
            company: req.company,
            price: req.price,
            original_price: req.original_price,
            discount: req.discount,
            doses: req.doses,
            description: req.description,
            image: req.image,
            capsule_info: req.capsule_info,
            packet: existing.packet,
        };
        self.products.update(product.clone()).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let deleted = self.products.delete(id).await?;
        if !deleted {
            return Err(DomainError::NotFound("Product not found".to_string()).into());
        }
        Ok(())
    }

    // Note: find and update are separate store operations, so two concurrent
    // mutations of the same counter can lose an update. Kept as-is; single
    // requests never see a negative counter.

    pub async fn increment_stock(&self, id: &str) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        product.packet += 1;
        self.products.update(product.clone()).await?;
        Ok(product)
    }

    pub async fn decrement_stock(&self, id: &str) -> Result<Product> {
        let mut product = self.get_product(id).await?;
        if product.packet == 0 {
            warn!(product_id = id, "Decrement rejected, product out of stock");
            return Err(DomainError::OutOfStock.into());
        }
        product.packet -= 1;
        self.products.update(product.clone()).await?;
        Ok(product)
    }

    pub async fn add_cart_item(&self, req: NewCartItem) -> Result<CartItem> {
        let item = new_item(req);
        self.carts.save(item.clone()).await?;
        Ok(item)
    }

    pub async fn list_cart_items(&self) -> Result<Vec<CartItem>> {
        self.carts.find_all().await
    }

    pub async fn cart_items_for_email(&self, email: &str) -> Result<Vec<CartItem>> {
        self.carts.find_by_email(email).await
    }

    pub async fn add_saved_item(&self, req: NewCartItem) -> Result<CartItem> {
        let item = new_item(req);
        self.saved_items.save(item.clone()).await?;
        Ok(item)
    }

    pub async fn list_saved_items(&self) -> Result<Vec<CartItem>> {
        self.saved_items.find_all().await
    }

    /// Two-step checkout: record the payment, then clear the payer's cart.
    /// The steps are not transactional. If the insert fails nothing is
    /// deleted; if the delete fails the payment is already durable and the
    /// partial state is surfaced as `CheckoutIncomplete`, never masked as a
    /// plain failure. Resubmitting the same payload records a second payment.
    pub async fn submit_payment(&self, req: PaymentRequest) -> Result<CheckoutReceipt> {
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            user_id: req.user_id,
            email: req.email,
            amount: req.amount,
            items: req.items,
            date: req.date,
        };

        self.payments.save(payment.clone()).await?;
        info!(payment_id = %payment.id, user_id = %payment.user_id, "Payment recorded");

        let deleted_count = match self.carts.delete_by_user(&payment.user_id).await {
            Ok(count) => count,
            Err(e) => {
                error!(
                    payment_id = %payment.id,
                    user_id = %payment.user_id,
                    error = %e,
                    "Payment recorded but cart clear failed"
                );
                return Err(DomainError::CheckoutIncomplete(payment.id).into());
            }
        };

        info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            deleted_count = deleted_count,
            "Checkout completed"
        );
        Ok(CheckoutReceipt {
            payment,
            deleted_count,
        })
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.payments.find_all().await
    }
}

fn new_item(req: NewCartItem) -> CartItem {
    CartItem {
        id: Uuid::new_v4().to_string(),
        user_id: req.user_id,
        email: req.email,
        product_id: req.product_id,
        name: req.name,
        price: req.price,
    }
}
