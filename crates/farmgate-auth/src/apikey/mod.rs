//! API key validation: fingerprinting, the key store adapter, and the
//! cached validator.

pub mod fingerprint;
pub mod memory;
pub mod store;
pub mod validator;

pub use fingerprint::fingerprint;
pub use memory::MemoryKeyStore;
pub use store::KeyStore;
pub use validator::{ApiKeyDenial, ApiKeyOutcome, ApiKeyValidator};
