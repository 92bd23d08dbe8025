pub mod documents;
pub mod manager;
pub mod models;
pub mod surveys;
pub mod users;

pub use manager::{Database, StoreError};
