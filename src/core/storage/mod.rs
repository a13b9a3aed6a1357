pub mod repository;

pub use repository::{DeliveryStore, StorageError};
