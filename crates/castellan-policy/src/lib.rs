//! Castellan Policy: decides whether a certificate request is allowed and
//! turns an allowed request into a signing specification.
//!
//! This crate provides:
//! - The immutable [`PolicyRegistry`] and its configurable [`PolicyDocument`]
//! - Key / signature compatibility checks ([`CompatibilityValidator`])
//! - Certificate profile lookup ([`ProfileResolver`])
//! - Signing specification assembly ([`build_spec`])
//! - The [`SigningBackend`] interface and the [`IssuanceService`] that drives it

pub mod backend;
pub mod document;
pub mod error;
pub mod profile;
pub mod registry;
pub mod service;
pub mod spec;
pub mod validator;

pub use backend::{IssuedCertificate, SigningBackend};
pub use document::PolicyDocument;
pub use error::PolicyError;
pub use profile::{
    CertificateProfile, ExtendedKeyUsage, KeyUsage, KeyUsageSet, ProfileResolver,
    ResolvedProfile, TemplateId,
};
pub use registry::{KeyAlgorithmPolicy, PolicyRegistry, SignatureMapping};
pub use service::{IssuanceService, IssueInput, IssueOutput};
pub use spec::{SigningSpecification, Subject, build_spec};
pub use validator::{CompatibilityValidator, ValidatedRequest};
