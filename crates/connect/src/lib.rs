//! QRPass Connect - HTTP access to the QR service.
//!
//! This crate implements the network traits defined in `qrpass-core`
//! (`QrApiTrait`, `TagApiTrait`) on top of `reqwest`.

pub mod client;

pub use client::{QrApiClient, DEFAULT_API_URL};
