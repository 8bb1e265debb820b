//! Shared fixtures for Harvest tests.
//!
//! Provides a `mockito` server standing in for the Snowflake SQL API, an encrypted RSA key
//! pair for key-pair authentication, and an in-memory browser session.

pub mod builder;
pub mod error;
pub mod keys;
pub mod snowflake;

pub use builder::{TestBuilder, TestContext};
pub use error::TestError;
pub use keys::TestKeyPair;

pub mod prelude {
    pub use crate::builder::{TestBuilder, TestContext};
    pub use crate::error::TestError;
    pub use crate::keys::TestKeyPair;
    pub use crate::snowflake::{error_body, result_body, wait_until_matched, WarehouseMocks};
}
