use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::server::error::Error;

pub const SESSION_DASHBOARD_KEY: &str = "harvest:dashboard:key";

const KEY_LENGTH: usize = 32;

/// Random key selecting the browser's warehouse session slot
#[derive(Default, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SessionDashboardKey(pub String);

impl SessionDashboardKey {
    /// Get the dashboard key from session
    pub async fn get(session: &Session) -> Result<Option<String>, Error> {
        Ok(session
            .get::<SessionDashboardKey>(SESSION_DASHBOARD_KEY)
            .await?
            .map(|SessionDashboardKey(key)| key))
    }

    /// Get the dashboard key from session, generating and storing one on first visit
    pub async fn get_or_insert(session: &Session) -> Result<String, Error> {
        if let Some(key) = Self::get(session).await? {
            return Ok(key);
        }

        let key: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(KEY_LENGTH)
            .map(char::from)
            .collect();

        session
            .insert(SESSION_DASHBOARD_KEY, SessionDashboardKey(key.clone()))
            .await?;

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use harvest_test_utils::prelude::*;

    use super::*;

    /// Expect a generated key to be stored and returned on later calls
    #[tokio::test]
    async fn generates_key_once() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;

        assert!(SessionDashboardKey::get(&test.session).await.unwrap().is_none());

        let first = SessionDashboardKey::get_or_insert(&test.session).await.unwrap();
        let second = SessionDashboardKey::get_or_insert(&test.session).await.unwrap();

        assert_eq!(first.len(), KEY_LENGTH);
        assert_eq!(first, second);

        Ok(())
    }

    /// Expect distinct browser sessions to receive distinct keys
    #[tokio::test]
    async fn keys_differ_between_sessions() -> Result<(), TestError> {
        let a = TestBuilder::new().build().await?;
        let b = TestBuilder::new().build().await?;

        let key_a = SessionDashboardKey::get_or_insert(&a.session).await.unwrap();
        let key_b = SessionDashboardKey::get_or_insert(&b.session).await.unwrap();

        assert_ne!(key_a, key_b);

        Ok(())
    }
}
