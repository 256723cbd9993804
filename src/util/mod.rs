pub mod crypto_helper;
pub mod pagination;
pub mod validation;
