pub mod confirm;
pub mod constraints;
pub mod converter;
pub mod engine;
pub mod summary;
pub mod validator;
