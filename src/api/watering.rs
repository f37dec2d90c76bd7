use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::WateringSchedule;

#[derive(Deserialize)]
struct ScheduleEnvelope {
    watering_schedule: WateringSchedule,
}

/// Creates a watering schedule for a plant that has none.
pub async fn create_schedule(
    client: &ApiClient,
    user_plant_id: i32,
    frequency_days: i32,
) -> Result<WateringSchedule, ApiError> {
    let response = client
        .http()
        .post(client.url("/watering_schedules"))
        .json(&json!({
            "user_plant_id": user_plant_id,
            "frequency_days": frequency_days,
        }))
        .send()
        .await?;
    let body: ScheduleEnvelope = ApiClient::decode(response).await?;
    Ok(body.watering_schedule)
}

/// Updates the frequency of an existing schedule.
pub async fn set_schedule_frequency(
    client: &ApiClient,
    schedule_id: i32,
    frequency_days: i32,
) -> Result<(), ApiError> {
    let response = client
        .http()
        .patch(client.url(&format!("/watering_schedules/{schedule_id}")))
        .json(&json!({ "frequency_days": frequency_days }))
        .send()
        .await?;
    ApiClient::expect_success(response).await
}

/// Deletes a schedule, independently of the plant it belongs to.
pub async fn delete_schedule(client: &ApiClient, schedule_id: i32) -> Result<(), ApiError> {
    let response = client
        .http()
        .delete(client.url(&format!("/watering_schedules/{schedule_id}")))
        .send()
        .await?;
    ApiClient::expect_success(response).await
}
