pub mod auth_service;
pub mod shop_service;
