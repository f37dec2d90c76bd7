use serde::Deserialize;
use serde_json::json;

use super::{ApiClient, ApiError};
use crate::models::{NewUser, UserProfile, UserUpdate};

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

/// Fetches a user's profile.
pub async fn get_user_profile(client: &ApiClient, user_id: i32) -> Result<UserProfile, ApiError> {
    let response = client
        .http()
        .get(client.url(&format!("/users/{user_id}")))
        .send()
        .await?;
    let body: UserEnvelope = ApiClient::decode(response).await?;
    Ok(body.user)
}

/// Logs in by email. The backend has no passwords; email is the credential.
pub async fn login(client: &ApiClient, email: &str) -> Result<UserProfile, ApiError> {
    let response = client
        .http()
        .post(client.url("/users/login"))
        .json(&json!({ "email": email }))
        .send()
        .await?;
    let body: UserEnvelope = ApiClient::decode(response).await?;
    Ok(body.user)
}

/// Creates a new account.
pub async fn create_user(client: &ApiClient, new_user: &NewUser) -> Result<UserProfile, ApiError> {
    let response = client
        .http()
        .post(client.url("/users"))
        .json(new_user)
        .send()
        .await?;
    let body: UserEnvelope = ApiClient::decode(response).await?;
    Ok(body.user)
}

/// Updates profile fields. Only non-empty form fields are sent. Callers are
/// expected to validate a changed zip code through geocoding first.
pub async fn update_user(
    client: &ApiClient,
    user_id: i32,
    form: &UserUpdate,
) -> Result<UserProfile, ApiError> {
    let mut payload = serde_json::Map::new();
    if !form.name.trim().is_empty() {
        payload.insert("name".to_string(), json!(form.name));
    }
    if !form.email.trim().is_empty() {
        payload.insert("email".to_string(), json!(form.email));
    }
    if !form.garden_name.trim().is_empty() {
        payload.insert("garden_name".to_string(), json!(form.garden_name));
    }
    if !form.zip_code.trim().is_empty() {
        payload.insert("zip_code".to_string(), json!(form.zip_code));
    }

    let response = client
        .http()
        .patch(client.url(&format!("/users/{user_id}")))
        .json(&payload)
        .send()
        .await?;
    let body: UserEnvelope = ApiClient::decode(response).await?;
    Ok(body.user)
}

/// Updates a single notification flag (`watering_reminders_enabled` or
/// `weather_alerts_enabled`).
pub async fn update_user_flag(
    client: &ApiClient,
    user_id: i32,
    flag: &str,
    enabled: bool,
) -> Result<UserProfile, ApiError> {
    let response = client
        .http()
        .patch(client.url(&format!("/users/{user_id}")))
        .json(&json!({ flag: enabled }))
        .send()
        .await?;
    let body: UserEnvelope = ApiClient::decode(response).await?;
    Ok(body.user)
}

/// Permanently deletes an account.
pub async fn delete_user(client: &ApiClient, user_id: i32) -> Result<(), ApiError> {
    let response = client
        .http()
        .delete(client.url(&format!("/users/{user_id}")))
        .send()
        .await?;
    ApiClient::expect_success(response).await
}
