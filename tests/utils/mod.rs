pub mod mocks;
pub mod setup;
pub mod signing;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::{CountingLedger, MockChain, TableLevelCurve};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
#[allow(unused_imports)]
pub use signing::TestSigner;
