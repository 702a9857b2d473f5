pub mod blob_service;
pub mod product_service;

pub use blob_service::{AzureBlobStore, BlobStore};
