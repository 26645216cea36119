//! Key-value persistence consumed by the tag cache and the self QR service.

mod storage_traits;

pub use storage_traits::KeyValueStoreTrait;
