//! Image Firewall Storage Library
//!
//! This crate provides the object storage abstraction used by the moderation
//! router, with implementations for S3 and the local filesystem.
//!
//! # Locations
//!
//! Every operation names a bucket explicitly. The router works against three
//! of them (intake, allowed, quarantine) and moves objects between them
//! without renaming, so the same key is used on both sides of a copy.
//!
//! Keys must not contain `..` or a leading `/`; validation is centralized in
//! the `keys` module so all backends reject the same input.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use firewall_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
