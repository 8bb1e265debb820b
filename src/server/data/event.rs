use crate::server::{
    error::Error,
    model::event::AuditEvent,
    warehouse::{Statement, WarehouseSession},
};

pub const INSERT_EVENT_SQL: &str = "INSERT INTO SEGUIMIENTO_EVENTOS (TIPO_EVENTO, DETALLE_EVENTO, UNIDAD, FECHA_HORA, TAG) VALUES (?, ?, ?, ?, ?)";

pub struct EventRepository<'a> {
    session: &'a WarehouseSession,
}

impl<'a> EventRepository<'a> {
    /// Creates a new instance of [`EventRepository`]
    pub fn new(session: &'a WarehouseSession) -> Self {
        Self { session }
    }

    /// Appends `event` to the audit table
    pub async fn insert(&self, event: &AuditEvent) -> Result<(), Error> {
        let statement = Statement::new(INSERT_EVENT_SQL)
            .bind(event.event_type.as_str())
            .bind(event.detail.as_str())
            .bind(event.unit.as_str())
            .bind(event.timestamp.as_str())
            .bind(event.tag);

        self.session.execute(&statement).await?;

        Ok(())
    }
}
