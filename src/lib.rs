//! Client for AI image generation over a hosted-inference API
//!
//! Submits a text prompt as a remote prediction job, polls it to
//! completion, and falls back across transports (proxy functions, direct
//! API, optional placeholder) so callers get one uniform result envelope.

pub mod error;
pub mod generator;
pub mod models;
pub mod replicate;
pub mod strategy;

pub use error::{Error, Result};
pub use generator::Generator;
