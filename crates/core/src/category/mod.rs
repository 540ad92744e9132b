//! Spending categories: the static set shared by everyone plus each user's own.

pub mod error;
pub mod service;
pub mod types;

pub use error::CategoryError;
pub use service::CategoryService;
pub use types::{Category, CategoryInput};
