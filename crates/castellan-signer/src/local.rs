//! Keys generated and held in process memory.
//!
//! A [`LocallyHeldKey`] lives for a single issuance, typically to sign a
//! certificate signing request. Signing is synchronous.

use std::fmt;

use castellan_core::models::algorithm::{
    HashAlgorithm, PublicKeyAlgorithm, SignatureAlgorithm, SigningScheme,
};
use castellan_core::models::authority::{KeyCustody, KeyIdentity};
use p256::ecdsa::signature::hazmat::PrehashSigner;
use p256::elliptic_curve::rand_core::OsRng;
use p256::pkcs8::EncodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::SignerError;
use crate::key::SigningKey;

/// P-521 field size in bytes.
const P521_FIELD_BYTES: usize = 66;

enum KeyMaterial {
    Rsa(Box<RsaPrivateKey>),
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
    P521(p521::ecdsa::SigningKey),
}

/// An ephemeral private key held by this process.
pub struct LocallyHeldKey {
    material: KeyMaterial,
    algorithm: PublicKeyAlgorithm,
    size: u32,
    public_key_der: Vec<u8>,
    identity: KeyIdentity,
}

impl LocallyHeldKey {
    /// Generate a fresh key pair.
    ///
    /// RSA accepts 2048, 3072 and 4096 bits; ECDSA accepts the curve sizes
    /// 256, 384 and 521.
    pub fn generate(algorithm: PublicKeyAlgorithm, size: u32) -> Result<Self, SignerError> {
        let material = match (algorithm, size) {
            (PublicKeyAlgorithm::Rsa, 2048 | 3072 | 4096) => {
                let key = RsaPrivateKey::new(&mut OsRng, size as usize)
                    .map_err(|e| SignerError::Local(format!("RSA key generation: {e}")))?;
                KeyMaterial::Rsa(Box::new(key))
            }
            (PublicKeyAlgorithm::Ecdsa, 256) => {
                KeyMaterial::P256(p256::ecdsa::SigningKey::random(&mut OsRng))
            }
            (PublicKeyAlgorithm::Ecdsa, 384) => {
                KeyMaterial::P384(p384::ecdsa::SigningKey::random(&mut OsRng))
            }
            (PublicKeyAlgorithm::Ecdsa, 521) => {
                KeyMaterial::P521(p521::ecdsa::SigningKey::random(&mut OsRng))
            }
            _ => return Err(SignerError::UnsupportedKey { algorithm, size }),
        };

        let public_key_der = encode_public_key(&material)?;
        let identity = KeyIdentity::new(format!(
            "local:sha256:{}",
            hex::encode(Sha256::digest(&public_key_der))
        ));

        Ok(Self {
            material,
            algorithm,
            size,
            public_key_der,
            identity,
        })
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// DER-encoded SubjectPublicKeyInfo, as placed into a CSR.
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key_der
    }

    /// Sign immediately on the calling thread.
    ///
    /// RSA keys produce PKCS#1 v1.5 signatures, ECDSA keys DER-encoded
    /// `(r, s)` pairs.
    pub fn sign_now(&self, scheme: SigningScheme, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        let algorithm = scheme.algorithm;
        if !algorithm.is_supported() {
            return Err(SignerError::UnsupportedScheme(algorithm));
        }
        if algorithm.key_algorithm() != self.algorithm {
            return Err(SignerError::AlgorithmMismatch {
                key: self.algorithm,
                scheme: algorithm,
            });
        }

        let digest = digest(algorithm.hash(), message);
        match &self.material {
            KeyMaterial::Rsa(key) => key
                .sign(pkcs1v15_padding(algorithm), &digest)
                .map_err(|e| SignerError::Local(format!("RSA sign: {e}"))),
            KeyMaterial::P256(key) => {
                let signature: p256::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| SignerError::Local(format!("ECDSA P-256 sign: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyMaterial::P384(key) => {
                let signature: p384::ecdsa::Signature = key
                    .sign_prehash(&digest)
                    .map_err(|e| SignerError::Local(format!("ECDSA P-384 sign: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyMaterial::P521(key) => {
                // SHA-256 output is shorter than half the P-521 field, which
                // the prehash signer rejects. Left-padding keeps the integer
                // value of the digest unchanged.
                let mut prehash = vec![0u8; P521_FIELD_BYTES.saturating_sub(digest.len())];
                prehash.extend_from_slice(&digest);
                let signature: p521::ecdsa::Signature = key
                    .sign_prehash(&prehash)
                    .map_err(|e| SignerError::Local(format!("ECDSA P-521 sign: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

impl SigningKey for LocallyHeldKey {
    fn identity(&self) -> KeyIdentity {
        self.identity.clone()
    }

    fn custody(&self) -> KeyCustody {
        KeyCustody::Local
    }

    async fn sign(&self, scheme: SigningScheme, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.sign_now(scheme, message)
    }
}

impl fmt::Debug for LocallyHeldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocallyHeldKey")
            .field("algorithm", &self.algorithm)
            .field("size", &self.size)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

fn encode_public_key(material: &KeyMaterial) -> Result<Vec<u8>, SignerError> {
    let encode_error = |e: p256::pkcs8::spki::Error| SignerError::Local(format!("public key: {e}"));
    let document = match material {
        KeyMaterial::Rsa(key) => key.to_public_key().to_public_key_der().map_err(encode_error)?,
        KeyMaterial::P256(key) => key.verifying_key().to_public_key_der().map_err(encode_error)?,
        KeyMaterial::P384(key) => key.verifying_key().to_public_key_der().map_err(encode_error)?,
        KeyMaterial::P521(key) => {
            let point = p521::ecdsa::VerifyingKey::from(key).to_encoded_point(false);
            p521::PublicKey::from_sec1_bytes(point.as_bytes())
                .map_err(|e| SignerError::Local(format!("public key: {e}")))?
                .to_public_key_der()
                .map_err(encode_error)?
        }
    };
    Ok(document.as_bytes().to_vec())
}

fn digest(hash: HashAlgorithm, message: &[u8]) -> Vec<u8> {
    match hash {
        HashAlgorithm::Sha256 => Sha256::digest(message).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(message).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(message).to_vec(),
    }
}

fn pkcs1v15_padding(algorithm: SignatureAlgorithm) -> Pkcs1v15Sign {
    match algorithm.hash() {
        HashAlgorithm::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlgorithm::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlgorithm::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}
