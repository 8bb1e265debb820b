use std::sync::Arc;

use mockito::{Server, ServerGuard};
use tower_sessions::{MemoryStore, Session};

use crate::{error::TestError, keys::TestKeyPair, snowflake::WarehouseMocks};

/// Builds a [`TestContext`]
#[derive(Default)]
pub struct TestBuilder {
    fresh_key: bool,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a dedicated key pair instead of reusing the shared one
    pub fn with_fresh_key(mut self) -> Self {
        self.fresh_key = true;
        self
    }

    pub async fn build(self) -> Result<TestContext, TestError> {
        let server = Server::new_async().await;

        let key = if self.fresh_key {
            KeyHandle::Owned(TestKeyPair::generate()?)
        } else {
            KeyHandle::Shared(TestKeyPair::shared())
        };

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        Ok(TestContext {
            server,
            key,
            session,
        })
    }
}

enum KeyHandle {
    Shared(&'static TestKeyPair),
    Owned(TestKeyPair),
}

/// Mock warehouse, key pair, and browser session for one test
pub struct TestContext {
    pub server: ServerGuard,
    key: KeyHandle,
    pub session: Session,
}

impl TestContext {
    pub fn key(&self) -> &TestKeyPair {
        match &self.key {
            KeyHandle::Shared(key) => key,
            KeyHandle::Owned(key) => key,
        }
    }

    /// URL the application should use as its SQL API base
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Mock endpoint builders for the warehouse
    pub fn warehouse(&mut self) -> WarehouseMocks<'_> {
        WarehouseMocks::new(&mut self.server)
    }
}
