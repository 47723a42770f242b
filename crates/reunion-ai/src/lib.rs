//! Reunion probability consultation: form intake and validation, the remote analysis
//! client, local fallback scoring and the gated report view.

pub mod analysis;
pub mod config;
pub mod consultation;
pub mod error;
pub mod report;
pub mod telemetry;
