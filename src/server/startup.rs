use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::server::{
    config::Config, error::Error, model::app::AppState, scheduler::Scheduler,
    service::session::WarehouseSessionService, warehouse::SnowflakeClient,
};

/// Browser session inactivity after which the dashboard key is forgotten
pub const SESSION_INACTIVITY_HOURS: i64 = 8;

/// Build the warehouse client and the per-user session service
pub fn build_app_state(config: &Config) -> Result<AppState, Error> {
    let client = SnowflakeClient::new(config)?;

    Ok(AppState {
        sessions: WarehouseSessionService::new(client),
    })
}

/// Configure cookie sessions carrying each browser's dashboard key
pub fn build_session_layer() -> SessionManagerLayer<MemoryStore> {
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry};

    // Set secure based on build mode: in development (debug) use false, otherwise true.
    let development_mode = cfg!(debug_assertions);
    let secure_cookies = !development_mode;

    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_INACTIVITY_HOURS)))
}

/// Register the background jobs and start the scheduler
pub async fn start_scheduler(state: &AppState) -> Result<(), Error> {
    Scheduler::new(state.sessions.clone()).await?.start().await
}
