//! Castellan Signer: a uniform signing interface over keys held in
//! process memory and keys held by an external custodian.

pub mod custodian;
pub mod error;
pub mod key;
pub mod local;

pub use custodian::{CustodianBackedKey, CustodianError, CustodianSignRequest, KeyCustodian};
pub use error::SignerError;
pub use key::SigningKey;
pub use local::LocallyHeldKey;
