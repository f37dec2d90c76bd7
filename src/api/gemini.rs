use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::PlantSuggestion;

/// AI-assisted lookup: suggested catalog fields for a scientific name.
pub async fn fetch_plant_info(
    client: &ApiClient,
    scientific_name: &str,
) -> Result<PlantSuggestion, ApiError> {
    let response = client
        .http()
        .post(client.url("/gemini"))
        .json(&json!({ "scientific_name": scientific_name }))
        .send()
        .await?;
    ApiClient::decode(response).await
}

/// Scientific-name completions for a partial input.
pub async fn fetch_name_suggestions(
    client: &ApiClient,
    partial_name: &str,
) -> Result<Vec<String>, ApiError> {
    let response = client
        .http()
        .post(client.url("/gemini/suggestions"))
        .json(&json!({ "partial_name": partial_name }))
        .send()
        .await?;
    ApiClient::decode(response).await
}
