use serde::Deserialize;

use super::{ApiClient, ApiError};
use crate::models::{PlantInfo, UserPlant, UserPlantInput};

#[derive(Deserialize)]
struct UserPlantsEnvelope {
    user_plants: Vec<UserPlant>,
}

#[derive(Deserialize)]
struct UserPlantEnvelope {
    user_plant: UserPlant,
}

#[derive(Deserialize)]
struct CatalogEnvelope {
    plants: Vec<PlantInfo>,
}

/// Fetches the shared plant catalog (used for autofill matching).
pub async fn get_catalog_plants(client: &ApiClient) -> Result<Vec<PlantInfo>, ApiError> {
    let response = client.http().get(client.url("/plants")).send().await?;
    let body: CatalogEnvelope = ApiClient::decode(response).await?;
    Ok(body.plants)
}

/// Fetches all of a user's plants, with nested catalog info, tags and optional
/// watering schedule.
pub async fn get_user_plants(client: &ApiClient, user_id: i32) -> Result<Vec<UserPlant>, ApiError> {
    let response = client
        .http()
        .get(client.url(&format!("/user_plants/all/{user_id}")))
        .send()
        .await?;
    let body: UserPlantsEnvelope = ApiClient::decode(response).await?;
    Ok(body.user_plants)
}

/// Fetches a single user plant by id.
pub async fn get_user_plant_by_id(client: &ApiClient, id: i32) -> Result<UserPlant, ApiError> {
    let response = client
        .http()
        .get(client.url(&format!("/user_plants/{id}")))
        .send()
        .await?;
    let body: UserPlantEnvelope = ApiClient::decode(response).await?;
    Ok(body.user_plant)
}

/// Creates a new user plant.
pub async fn create_user_plant(
    client: &ApiClient,
    input: &UserPlantInput,
) -> Result<UserPlant, ApiError> {
    let response = client
        .http()
        .post(client.url("/user_plants"))
        .json(input)
        .send()
        .await?;
    let body: UserPlantEnvelope = ApiClient::decode(response).await?;
    Ok(body.user_plant)
}

/// Replaces a user plant (full PUT).
pub async fn update_user_plant(
    client: &ApiClient,
    id: i32,
    input: &UserPlantInput,
) -> Result<(), ApiError> {
    let response = client
        .http()
        .put(client.url(&format!("/user_plants/{id}")))
        .json(input)
        .send()
        .await?;
    ApiClient::expect_success(response).await
}

/// Deletes a user plant.
pub async fn delete_user_plant(client: &ApiClient, id: i32) -> Result<(), ApiError> {
    let response = client
        .http()
        .delete(client.url(&format!("/user_plants/{id}")))
        .send()
        .await?;
    ApiClient::expect_success(response).await
}
