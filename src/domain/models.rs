use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub company: String,
    pub price: f64,
    pub original_price: f64,
    pub discount: f64,
    pub doses: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capsule_info: Option<String>,
    /// Stock counter. Unsigned so it can never go negative; a decrement at
    /// zero is rejected, not clamped.
    pub packet: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub company: String,
    pub price: f64,
    pub original_price: f64,
    pub discount: f64,
    pub doses: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub capsule_info: Option<String>,
    #[serde(default)]
    pub packet: u32,
}

/// Full-replacement body of `PATCH /products/{id}`. Deliberately has no
/// `packet` field: stock is only touched by the increment/decrement routes.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    pub company: String,
    pub price: f64,
    pub original_price: f64,
    pub discount: f64,
    pub doses: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub capsule_info: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub user_id: String,
    pub email: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub amount: f64,
    pub items: Vec<String>,
    /// Client-supplied timestamp, stored as submitted.
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub user_id: String,
    pub email: String,
    pub amount: f64,
    pub items: Vec<String>,
    pub date: String,
}

/// Result of the two-step checkout: the recorded payment plus how many cart
/// items were cleared for that user.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub payment: Payment,
    pub deleted_count: u64,
}
