// Public API - what other modules can use
pub use signature::{AuthError, SignatureVerifier, DEFAULT_MIGRATION_MESSAGE};

mod signature;
#[cfg(test)]
pub(crate) mod test_support;
