//! CSV and PNG downloads of the production table.
//!
//! Every successful export records a download event in the audit table. Recording runs in a
//! background task once the file is built, so a slow or failing write never holds back the
//! download; failures are logged.

use std::sync::{Arc, OnceLock};

use dioxus_logger::tracing;
use resvg::{tiny_skia, usvg};

use crate::{
    model::{chart, production::ProductionTable},
    server::{
        error::{dashboard::DashboardError, export::ExportError, Error},
        model::event::{CSV_DETAIL, DOWNLOAD_EVENT, PNG_DETAIL},
        service::{event::EventService, production::ProductionService, session::WarehouseSessionService},
    },
};

pub const CSV_FILE_NAME: &str = "gross_agricultural_production.csv";
pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const PNG_FILE_NAME: &str = "chart.png";
pub const PNG_CONTENT_TYPE: &str = "image/png";

pub struct ExportService<'a> {
    sessions: &'a WarehouseSessionService,
}

impl<'a> ExportService<'a> {
    /// Creates a new instance of [`ExportService`]
    pub fn new(sessions: &'a WarehouseSessionService) -> Self {
        Self { sessions }
    }

    /// Raw production table of `regions` as CSV
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)` - CSV bytes, returned without waiting for the download to be recorded
    /// - `Err(Error::DashboardError(DashboardError::EmptySelection))` - No region selected
    /// - `Err(Error::DashboardError(DashboardError::NoData))` - No rows for the selection
    pub async fn csv(&self, key: &str, regions: &[String]) -> Result<Vec<u8>, Error> {
        let table = self.fetch(key, regions).await?;
        let bytes = to_csv(&table)?;

        self.record_download(key, CSV_DETAIL, regions);

        Ok(bytes)
    }

    /// Overlapping area chart of `regions` rendered as PNG
    pub async fn chart_png(&self, key: &str, regions: &[String]) -> Result<Vec<u8>, Error> {
        let table = self.fetch(key, regions).await?;
        let points = table.to_display_units().sorted_by_region().melt();
        let bytes = render_png(&chart::render_svg(&points))?;

        self.record_download(key, PNG_DETAIL, regions);

        Ok(bytes)
    }

    async fn fetch(&self, key: &str, regions: &[String]) -> Result<ProductionTable, Error> {
        let table = ProductionService::new(self.sessions).fetch(key, regions).await?;

        if table.is_empty() {
            return Err(DashboardError::NoData.into());
        }

        Ok(table)
    }

    /// Records the download in a background task
    fn record_download(&self, key: &str, detail: &'static str, regions: &[String]) {
        let sessions = self.sessions.clone();
        let key = key.to_string();
        let unit = regions.join(", ");

        tokio::spawn(async move {
            if let Err(e) = EventService::new(&sessions)
                .log(&key, DOWNLOAD_EVENT, detail, &unit)
                .await
            {
                tracing::warn!("Failed to record {} download for {}: {}", detail, unit, e);
            }
        });
    }
}

/// Serializes `table` with one column per year
///
/// The region index is not written. Values are unscaled; missing values are empty cells.
pub fn to_csv(table: &ProductionTable) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(&table.years)?;

    for row in &table.rows {
        writer.write_record(
            row.values
                .iter()
                .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()).into())
}

static FONT_DATABASE: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// System fonts, loaded on first use
fn font_database() -> Arc<usvg::fontdb::Database> {
    Arc::clone(FONT_DATABASE.get_or_init(|| {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", fontdb.len());

        Arc::new(fontdb)
    }))
}

/// Rasterizes an SVG document at its intrinsic size
pub fn render_png(svg: &str) -> Result<Vec<u8>, Error> {
    let options = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| ExportError::SvgParse(e.to_string()))?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or(ExportError::PixmapAllocation { width, height })?;

    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    let png = pixmap
        .encode_png()
        .map_err(|e| ExportError::PngEncode(e.to_string()))?;

    Ok(png)
}
