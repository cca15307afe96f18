//! Signed attestation and registration URL construction.

use crate::attestation::domain::{InviteToken, RecordId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Configuration for the URL signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSignerConfig {
    /// Public base URL of the application, without a trailing slash.
    pub base_url: String,
    /// Secret mixed into every URL signature.
    pub signing_secret: String,
}

/// Builds signed deep links carried in reminder notices.
///
/// The signature binds the path to the configured secret so the attestation
/// and registration handlers can reject tampered links without a session.
#[derive(Debug, Clone)]
pub struct AttestationUrlSigner {
    base_url: String,
    secret: Vec<u8>,
}

impl AttestationUrlSigner {
    /// Creates a signer from configuration.
    #[must_use]
    pub fn new(config: UrlSignerConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            secret: config.signing_secret.into_bytes(),
        }
    }

    /// Returns the signed URL opening the given attestation record.
    #[must_use]
    pub fn attestation_url(&self, record_id: RecordId) -> String {
        self.signed(&format!("/attestations/{record_id}"))
    }

    /// Returns the signed registration URL for an invite token.
    #[must_use]
    pub fn registration_url(&self, token: &InviteToken) -> String {
        self.signed(&format!("/register/{token}"))
    }

    fn signed(&self, path: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.secret);
        hasher.update(path.as_bytes());
        let digest = hasher.finalize();
        let mut signature = String::with_capacity(64);
        for byte in digest {
            signature.push_str(&format!("{byte:02x}"));
        }
        format!("{}{}?sig={}", self.base_url, path, signature)
    }
}
