use crate::{
    model::production::ProductionTable,
    server::{
        data::production::ProductionRepository,
        error::{dashboard::DashboardError, Error},
        service::session::WarehouseSessionService,
    },
};

pub struct ProductionService<'a> {
    sessions: &'a WarehouseSessionService,
}

impl<'a> ProductionService<'a> {
    /// Creates a new instance of [`ProductionService`]
    pub fn new(sessions: &'a WarehouseSessionService) -> Self {
        Self { sessions }
    }

    /// Regions available for selection
    pub async fn list_regions(&self, key: &str) -> Result<Vec<String>, Error> {
        self.sessions
            .run(key, |session| async move {
                ProductionRepository::new(&session).list_regions().await
            })
            .await
    }

    /// Raw production rows of `regions`, concatenated in selection order
    ///
    /// Regions are fetched one after another with one statement each. An empty selection is
    /// rejected before any statement runs.
    pub async fn fetch(&self, key: &str, regions: &[String]) -> Result<ProductionTable, Error> {
        if regions.is_empty() {
            return Err(DashboardError::EmptySelection.into());
        }

        self.sessions
            .run(key, |session| async move {
                let repository = ProductionRepository::new(&session);

                let mut tables = Vec::with_capacity(regions.len());
                for region in regions {
                    tables.push(repository.fetch_region(region).await?);
                }

                Ok(ProductionTable::concat(tables))
            })
            .await
    }
}
