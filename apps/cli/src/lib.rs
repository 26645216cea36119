//! QRPass command line host.
//!
//! Wires the SQLite store and the HTTP client into the core services and
//! exposes them as subcommands.

pub mod config;
pub mod main_lib;
pub mod qr_cmd;
pub mod tags_cmd;
pub mod views;

pub use main_lib::{build_context, init_tracing, AppContext};
