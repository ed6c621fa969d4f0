pub mod logging;
pub mod security;
