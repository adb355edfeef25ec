//! Domain models for castellan.
//!
//! These are the core types shared across all crates.

pub mod algorithm;
pub mod attestation;
pub mod authority;
pub mod certificate;
pub mod request;
