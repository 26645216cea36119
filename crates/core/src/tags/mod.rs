//! Tags module - tag code to label lookup backed by a persisted cache.

mod tags_model;
mod tags_service;
mod tags_traits;


// Re-export the public interface
pub use tags_model::{TagEntry, TagLoadState, TagMap};
pub use tags_service::TagCache;
pub use tags_traits::{TagApiTrait, TagCacheTrait};
