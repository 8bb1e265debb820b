use crate::server::service::session::WarehouseSessionService;

#[derive(Clone)]
pub struct AppState {
    pub sessions: WarehouseSessionService,
}
