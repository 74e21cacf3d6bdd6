use alloy_primitives::{eip191_hash_message, Address, Signature};
use k256::ecdsa::SigningKey;

/// Deterministic key derived from a single repeated byte.
pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn address_of(key: &SigningKey) -> Address {
    Address::from_private_key(key)
}

/// `personal_sign` over `message`, hex encoded with a 0x prefix.
pub fn sign_message(key: &SigningKey, message: &str) -> String {
    let hash = eip191_hash_message(message);
    let (signature, recovery_id) = key.sign_prehash_recoverable(hash.as_slice()).unwrap();
    let signature = Signature::from_signature_and_parity(signature, recovery_id.is_y_odd());
    format!("0x{}", hex::encode(signature.as_bytes()))
}
