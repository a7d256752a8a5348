pub mod db;
pub mod error;
pub mod resale;
pub mod reviews;

pub use error::{Error, Result};
