use chrono::Utc;

use crate::server::{
    data::event::EventRepository, error::Error, model::event::AuditEvent,
    service::session::WarehouseSessionService,
};

pub struct EventService<'a> {
    sessions: &'a WarehouseSessionService,
}

impl<'a> EventService<'a> {
    /// Creates a new instance of [`EventService`]
    pub fn new(sessions: &'a WarehouseSessionService) -> Self {
        Self { sessions }
    }

    /// Records a usage event for the user identified by `key`
    ///
    /// A failed write is returned to the caller as-is; it is not retried.
    pub async fn log(
        &self,
        key: &str,
        event_type: &str,
        detail: &str,
        unit: &str,
    ) -> Result<(), Error> {
        let event = AuditEvent::new(event_type, detail, unit, Utc::now());

        self.sessions
            .run(key, |session| async move {
                EventRepository::new(&session).insert(&event).await
            })
            .await
    }
}
