//! The signing-key interface shared by every key custodian.

use castellan_core::models::algorithm::SigningScheme;
use castellan_core::models::authority::{AuthorityTarget, KeyCustody, KeyIdentity};

use crate::error::SignerError;

/// A key that can produce signatures, wherever its material lives.
///
/// Implementations must never expose private key material: not through
/// [`SigningKey::identity`], not through `Debug`, and not through errors.
pub trait SigningKey: Send + Sync {
    /// Opaque reference to the key.
    fn identity(&self) -> KeyIdentity;

    /// Whether the key is held in this process or by a custodian.
    fn custody(&self) -> KeyCustody;

    /// The authority a custodian signs for. Locally held keys have none.
    fn authority(&self) -> Option<&AuthorityTarget> {
        None
    }

    /// Sign `message` with `scheme`. The message is hashed as the scheme
    /// prescribes; callers pass the raw bytes to be signed.
    fn sign(
        &self,
        scheme: SigningScheme,
        message: &[u8],
    ) -> impl Future<Output = Result<Vec<u8>, SignerError>> + Send;
}
