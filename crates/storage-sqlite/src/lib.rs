//! SQLite storage implementation for QR Pass.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the storage traits defined in `qrpass-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The key-value repository backing the self QR and tag map caches
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! All other crates (`core`, `connect`) are database-agnostic and work with traits.
//!
//! ```text
//! core (domain)          connect (http)
//!       │                      │
//!       └──────────┬───────────┘
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod kv;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

pub use kv::KeyValueRepository;

// Re-export from qrpass-core for convenience
pub use qrpass_core::errors::{DatabaseError, Error, Result};
