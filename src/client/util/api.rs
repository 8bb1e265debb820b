#[cfg(feature = "web")]
use harvest::model::api::{
    with_regions, ErrorDto, ProductionDto, PRODUCTION_PATH, REGIONS_PATH,
};

/// Retrieve the regions available for selection
#[cfg(feature = "web")]
pub async fn get_regions() -> Result<Vec<String>, String> {
    get_json(REGIONS_PATH.to_string()).await
}

/// Retrieve the production table of `regions` in display units
#[cfg(feature = "web")]
pub async fn get_production(regions: &[String]) -> Result<ProductionDto, String> {
    get_json(with_regions(PRODUCTION_PATH, regions)).await
}

#[cfg(feature = "web")]
async fn get_json<T>(url: String) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    use reqwasm::http::Request;

    let response = Request::get(&url)
        .credentials(reqwasm::http::RequestCredentials::Include)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    match response.status() {
        200 => response
            .json::<T>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e)),
        _ => {
            if let Ok(error_dto) = response.json::<ErrorDto>().await {
                Err(error_dto.error)
            } else {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(format!(
                    "An error occurred. Error details: request failed with status {}: {}",
                    response.status(),
                    error_text
                ))
            }
        }
    }
}
