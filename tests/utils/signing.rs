use alloy_primitives::{eip191_hash_message, Address, Signature};
use k256::ecdsa::SigningKey;

/// A wallet stand-in that signs with a deterministic key.
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    pub fn new(seed: u8) -> Self {
        Self {
            key: SigningKey::from_slice(&[seed; 32]).unwrap(),
        }
    }

    pub fn address(&self) -> String {
        Address::from_private_key(&self.key).to_string()
    }

    pub fn sign(&self, message: &str) -> String {
        let hash = eip191_hash_message(message);
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(hash.as_slice()).unwrap();
        let signature = Signature::from_signature_and_parity(signature, recovery_id.is_y_odd());
        format!("0x{}", hex::encode(signature.as_bytes()))
    }
}
