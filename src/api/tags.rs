use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::Tag;

#[derive(Deserialize)]
struct TagsEnvelope {
    tags: Vec<Tag>,
}

#[derive(Deserialize)]
struct TagEnvelope {
    tag: Tag,
}

/// Fetches all tags. Tags are shared across users.
pub async fn get_all_tags(client: &ApiClient) -> Result<Vec<Tag>, ApiError> {
    let response = client.http().get(client.url("/tags")).send().await?;
    let body: TagsEnvelope = ApiClient::decode(response).await?;
    Ok(body.tags)
}

/// Creates a tag by name.
pub async fn create_tag(client: &ApiClient, name: &str) -> Result<Tag, ApiError> {
    let response = client
        .http()
        .post(client.url("/tags"))
        .json(&json!({ "name": name }))
        .send()
        .await?;
    let body: TagEnvelope = ApiClient::decode(response).await?;
    Ok(body.tag)
}

/// Deletes a tag globally. Callers are responsible for cascading the removal
/// out of any locally cached plant tag sets.
pub async fn delete_tag(client: &ApiClient, id: i32) -> Result<(), ApiError> {
    let response = client
        .http()
        .delete(client.url(&format!("/tags/{id}")))
        .send()
        .await?;
    ApiClient::expect_success(response).await
}
