//! QRPass Core - Domain entities, services, and traits.
//!
//! This crate contains the health-status QR logic: risk tables, the tag
//! cache, the self QR lifecycle and scanned QR results. It is storage- and
//! transport-agnostic and defines traits that are implemented by the
//! `storage-sqlite` and `connect` crates.

pub mod constants;
pub mod errors;
pub mod locale;
pub mod qr;
pub mod risk;
pub mod storage;
pub mod tags;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use locale::Locale;
pub use risk::{QrDisplay, RiskCode, RiskDisplay};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
