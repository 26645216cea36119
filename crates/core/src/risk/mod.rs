//! Risk module - static risk tables and the shared risk display capability.

mod risk_constants;
mod risk_display;
mod risk_model;

#[cfg(test)]
mod risk_model_tests;

// Re-export the public interface
pub use risk_constants::*;
pub use risk_display::{QrDisplay, RiskDisplay};
pub use risk_model::{color_of, label_of, label_of_locale, level_of, score_of, RiskCode};
