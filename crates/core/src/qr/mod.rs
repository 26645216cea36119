//! QR module - self QR lifecycle, scanned QR results and the refresh controller.

mod controller;
mod qr_model;
mod qr_traits;
mod scanned_qr;
mod self_qr;
mod self_qr_service;
mod token;


// Re-export the public interface
pub use controller::{ControllerConfig, SelfQrController, SelfQrSnapshot};
pub use qr_model::{QrFreshness, QrImage, QrPayloadData, QrTag, RawQrPayload};
pub use qr_traits::{QrApiTrait, SelfQrServiceTrait};
pub use scanned_qr::{DecodedPayload, QrView, ScannedQr};
pub use self_qr::SelfQr;
pub use self_qr_service::SelfQrService;
pub use token::decode_token;
