//! Client for a Replicate-style predictions API
//!
//! Covers the two halves of the remote job lifecycle: creating a
//! prediction and polling it by id until it reaches a terminal state.

pub mod client;
pub mod predictions;

pub use client::ReplicateHttpClient;
pub use predictions::PredictionsClient;
