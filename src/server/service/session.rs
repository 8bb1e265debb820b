//! Per-user warehouse sessions with idle expiry.
//!
//! Each dashboard user owns one [`SessionSlot`], selected by the dashboard key stored in their
//! cookie session. A slot is either disconnected or holds a connected handle together with the
//! instant of the last successful operation. Handles idle for longer than [`IDLE_TIMEOUT_SECS`]
//! are dropped the next time the slot is used or when the sweeper visits it, and a new handle is
//! created on demand.

use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;
use tokio::sync::Mutex;

use crate::server::{
    error::{warehouse::WarehouseError, Error},
    service::retry::RetryContext,
    warehouse::{SnowflakeClient, WarehouseSession},
};

/// Idle time after which a session handle is discarded
pub const IDLE_TIMEOUT_SECS: i64 = 240;
/// A handle whose token expires within this window counts as expired
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// A session handle with a hard validity limit
pub trait ExpiringHandle {
    /// Instant after which the handle is rejected by the warehouse
    fn valid_until(&self) -> DateTime<Utc>;
}

impl ExpiringHandle for WarehouseSession {
    fn valid_until(&self) -> DateTime<Utc> {
        self.token_expires_at()
    }
}

/// Connection state of one user
pub struct SessionSlot<H> {
    handle: Option<H>,
    last_activity: DateTime<Utc>,
}

impl<H> Default for SessionSlot<H> {
    fn default() -> Self {
        Self {
            handle: None,
            last_activity: DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl<H> SessionSlot<H>
where
    H: ExpiringHandle + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Whether the held handle must no longer be used at `now`
    ///
    /// A disconnected slot is never expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Some(handle) = &self.handle else {
            return false;
        };

        let idle = now.signed_duration_since(self.last_activity);
        let token_remaining = handle.valid_until().signed_duration_since(now);

        idle > chrono::Duration::seconds(IDLE_TIMEOUT_SECS)
            || token_remaining <= chrono::Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }

    /// Drops the handle if it expired at `now`, returning whether it did
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_expired(now) {
            return false;
        }

        tracing::info!(
            "Discarding warehouse session idle since {}",
            self.last_activity.format("%Y-%m-%d %H:%M:%S")
        );
        self.invalidate();

        true
    }

    /// Records activity at `now`, keeping the handle alive for another idle period
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn invalidate(&mut self) {
        self.handle = None;
    }

    /// Returns the live handle, creating one with `create` when disconnected or expired at `now`
    pub async fn get_or_create<F, Fut>(&mut self, now: DateTime<Utc>, create: F) -> Result<H, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<H, Error>>,
    {
        self.check_expiry(now);

        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }

        let handle = create().await?;
        self.handle = Some(handle.clone());
        self.touch(now);

        Ok(handle)
    }
}

type SharedSlot<H> = Arc<Mutex<SessionSlot<H>>>;

/// Session slots of every dashboard user, keyed by dashboard key
pub struct SessionRegistry<H> {
    slots: Arc<Mutex<HashMap<String, SharedSlot<H>>>>,
}

impl<H> Clone for SessionRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<H> Default for SessionRegistry<H> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<H> SessionRegistry<H>
where
    H: ExpiringHandle + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot of the user identified by `key`, created disconnected on first use
    pub async fn slot(&self, key: &str) -> SharedSlot<H> {
        let mut slots = self.slots.lock().await;

        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }

    /// Removes slots that are expired or disconnected at `now`
    ///
    /// Slots held by a request in progress are skipped, including a request that fetched its
    /// slot but has not locked it yet. Returns the number of slots removed.
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut slots = self.slots.lock().await;
        let before = slots.len();

        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }

            match slot.try_lock() {
                Ok(mut slot) => {
                    slot.check_expiry(now);
                    slot.is_connected()
                }
                Err(_) => true,
            }
        });

        before - slots.len()
    }
}

/// Runs warehouse operations on behalf of dashboard users
///
/// Operations of one user are serialized by the lock on their slot; different users proceed
/// independently.
#[derive(Clone)]
pub struct WarehouseSessionService {
    client: SnowflakeClient,
    registry: SessionRegistry<WarehouseSession>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl WarehouseSessionService {
    pub fn new(client: SnowflakeClient) -> Self {
        Self {
            client,
            registry: SessionRegistry::new(),
            max_attempts: RetryContext::DEFAULT_MAX_ATTEMPTS,
            retry_delay: RetryContext::DEFAULT_DELAY,
        }
    }

    /// Overrides the fixed delay between connection attempts
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn registry(&self) -> &SessionRegistry<WarehouseSession> {
        &self.registry
    }

    /// Runs `operation` with the live session of the user identified by `key`
    pub async fn run<R, F, Fut>(&self, key: &str, operation: F) -> Result<R, Error>
    where
        F: FnOnce(WarehouseSession) -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        self.run_at(key, Utc::now(), operation).await
    }

    /// Runs `operation` as [`Self::run`] with the expiry check evaluated at `now`
    ///
    /// On success the slot is touched, so any successful operation restarts the idle timeout.
    pub async fn run_at<R, F, Fut>(
        &self,
        key: &str,
        now: DateTime<Utc>,
        operation: F,
    ) -> Result<R, Error>
    where
        F: FnOnce(WarehouseSession) -> Fut,
        Fut: Future<Output = Result<R, Error>>,
    {
        let slot = self.registry.slot(key).await;
        let mut slot = slot.lock().await;

        let session = slot.get_or_create(now, || self.connect()).await?;
        let result = operation(session).await?;

        slot.touch(now);

        Ok(result)
    }

    /// Creates a session, retrying with a fixed delay until the attempt limit
    async fn connect(&self) -> Result<WarehouseSession, Error> {
        let mut retry = RetryContext::new()
            .with_max_attempts(self.max_attempts)
            .with_delay(self.retry_delay);

        let result = retry
            .execute_with_retry("warehouse connection", || self.client.connect())
            .await;

        result.map_err(|e| {
            WarehouseError::NoSession {
                attempts: retry.failures().len() as u32,
                last_error: e.to_string(),
            }
            .into()
        })
    }
}
