//! Castellan Core: domain models and the error taxonomy shared by every
//! castellan crate.

pub mod error;
pub mod models;

pub use error::{CastellanError, CastellanResult, ErrorClass};
