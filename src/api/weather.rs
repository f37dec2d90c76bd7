use reqwest::header;

use super::{ApiClient, ApiError};
use crate::models::{GeocodePoint, WeatherReport};

/// Fetches current conditions for a zip code. The weather proxy occasionally
/// returns HTML error pages, so the content type is checked before decoding.
pub async fn get_weather(client: &ApiClient, zip: &str) -> Result<WeatherReport, ApiError> {
    let response = client
        .http()
        .get(client.url("/weather"))
        .query(&[("zip", zip)])
        .send()
        .await?;
    let response = ApiClient::error_for_status(response).await?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("application/json") {
        return Err(ApiError::InvalidResponse(format!(
            "expected JSON from weather endpoint, got content type {content_type:?}"
        )));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Resolves a zip code to coordinates. Also serves as zip validation: an
/// unknown zip yields the backend's `details` message.
pub async fn geocode_zip(client: &ApiClient, zip_code: &str) -> Result<GeocodePoint, ApiError> {
    let response = client
        .http()
        .get(client.url("/geocode"))
        .query(&[("zip_code", zip_code)])
        .send()
        .await?;
    ApiClient::decode(response).await
}
