use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CertError {
    #[error("certificate signature does not verify against the trust anchor")]
    AnchorSignatureInvalid,
    #[error("certificate full name is already revoked")]
    AlreadyRevoked,
}
