use tower_sessions::Session;

use crate::{
    model::api::REGION_QUERY_KEY,
    server::{error::Error, model::session::dashboard::SessionDashboardKey},
};

/// Values of every `region` query parameter in request order
///
/// Unrelated parameters are ignored and repeated regions are kept.
pub fn selected_regions(params: Vec<(String, String)>) -> Vec<String> {
    params
        .into_iter()
        .filter(|(key, _)| key == REGION_QUERY_KEY)
        .map(|(_, value)| value)
        .collect()
}

/// Dashboard key of the requesting browser, assigned on its first request
pub async fn dashboard_key(session: &Session) -> Result<String, Error> {
    SessionDashboardKey::get_or_insert(session).await
}
