use serde::{Deserialize, Serialize};

use crate::model::production::ProductionTable;

/// Path of the region list endpoint
pub const REGIONS_PATH: &str = "/api/regions";
/// Path of the production table endpoint
pub const PRODUCTION_PATH: &str = "/api/production";
/// Path of the CSV download endpoint
pub const PRODUCTION_CSV_PATH: &str = "/api/production/csv";
/// Path of the chart PNG download endpoint
pub const PRODUCTION_CHART_PATH: &str = "/api/production/chart.png";

/// Label of the CSV download button
pub const CSV_DOWNLOAD_LABEL: &str = "Download CSV";
/// Label of the chart download button
pub const PNG_DOWNLOAD_LABEL: &str = "Download Chart as PNG";

/// Query string key carrying one selected region
pub const REGION_QUERY_KEY: &str = "region";

/// Shown when a request carries no selected region
pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one country.";
/// Shown when the selected regions have no rows
pub const NO_DATA_MESSAGE: &str = "No data available for the selected countries.";

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Production figures for the selected regions in display units, sorted by region
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ProductionDto {
    pub table: ProductionTable,
}

/// Builds `region=A&region=B` for the given selection, percent-encoding each name
pub fn region_query(regions: &[String]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(regions.iter().map(|region| (REGION_QUERY_KEY, region)))
        .finish()
}

/// Appends the encoded region selection to an endpoint path
pub fn with_regions(path: &str, regions: &[String]) -> String {
    format!("{}?{}", path, region_query(regions))
}

/// Label and link of the CSV and chart downloads for the selection
pub fn download_links(regions: &[String]) -> [(&'static str, String); 2] {
    [
        (CSV_DOWNLOAD_LABEL, with_regions(PRODUCTION_CSV_PATH, regions)),
        (PNG_DOWNLOAD_LABEL, with_regions(PRODUCTION_CHART_PATH, regions)),
    ]
}
