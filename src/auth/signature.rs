use alloy_primitives::{Address, Signature};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument};

pub const DEFAULT_MIGRATION_MESSAGE: &str =
    "I want to migrate my Rarity Manifested assets to Arising";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Signer recovery failed: {0}")]
    Recovery(String),
}

/// Checks `personal_sign` signatures over the fixed migration message.
///
/// This proves possession of the signing key for an address and nothing
/// about on-chain state.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    message: String,
}

impl SignatureVerifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Recovers the address that signed the migration message.
    pub fn recover(&self, signature: &str) -> Result<Address, AuthError> {
        let raw = signature.trim();
        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
            .map_err(|e| AuthError::MalformedSignature(e.to_string()))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| AuthError::MalformedSignature(e.to_string()))?;

        signature
            .recover_address_from_msg(self.message.as_bytes())
            .map_err(|e| AuthError::Recovery(e.to_string()))
    }

    /// True when `signature` recovers to `claimed_address`. Address case is
    /// ignored; any malformed input verifies false.
    #[instrument(skip(self, signature))]
    pub fn verify(&self, claimed_address: &str, signature: &str) -> bool {
        let claimed = match Address::from_str(claimed_address.trim()) {
            Ok(address) => address,
            Err(e) => {
                debug!(error = %AuthError::MalformedAddress(e.to_string()), "Rejecting claimed address");
                return false;
            }
        };

        match self.recover(signature) {
            Ok(recovered) => {
                let matches = recovered == claimed;
                debug!(recovered = %recovered, matches, "Recovered signer");
                matches
            }
            Err(e) => {
                debug!(error = %e, "Signature verification failed");
                false
            }
        }
    }
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIGRATION_MESSAGE)
    }
}
