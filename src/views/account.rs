use tracing::{info, warn};

use super::PlantPalBackend;
use crate::api::ApiError;
use crate::models::{NewUser, UserProfile, UserUpdate};
use crate::session::{Session, SessionUpdate};

/// Signs in by email and persists the session subset (id, zip, name).
pub async fn login(
    backend: &dyn PlantPalBackend,
    session: &mut Session,
    email: &str,
) -> Result<UserProfile, ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::Validation("Enter your email address.".to_string()));
    }

    let profile = backend.login(email).await?;
    remember(session, &profile);
    info!(user_id = profile.id, "Signed in.");
    Ok(profile)
}

/// Creates an account and signs the new user in.
pub async fn create_account(
    backend: &dyn PlantPalBackend,
    session: &mut Session,
    new_user: NewUser,
) -> Result<UserProfile, ApiError> {
    let mut problems = Vec::new();
    if new_user.name.trim().is_empty() {
        problems.push("Enter your name.");
    }
    if new_user.email.trim().is_empty() {
        problems.push("Enter your email address.");
    }
    if new_user.zip_code.trim().is_empty() {
        problems.push("Enter your zip code.");
    }
    if !problems.is_empty() {
        return Err(ApiError::Validation(problems.join(" ")));
    }

    let profile = backend.create_user(&new_user).await?;
    remember(session, &profile);
    info!(user_id = profile.id, "Account created.");
    Ok(profile)
}

/// Deletes the account and clears the local session. The destructive-action
/// confirmation happens at the call site.
pub async fn delete_account(
    backend: &dyn PlantPalBackend,
    session: &mut Session,
    user_id: i32,
) -> Result<(), ApiError> {
    backend.delete_user(user_id).await?;
    if let Err(e) = session.clear() {
        warn!(error = %e, "Account deleted but the local session could not be cleared.");
    }
    Ok(())
}

fn remember(session: &mut Session, profile: &UserProfile) {
    let update = SessionUpdate {
        user_id: Some(profile.id),
        zip_code: profile.zip_code.clone(),
        user_name: Some(profile.name.clone()),
        garden_name: profile.garden_name.clone(),
    };
    if let Err(e) = session.update(update) {
        warn!(error = %e, "Signed in but the session could not be persisted.");
    }
}

/// The account-settings form: pre-populated from the profile, submitted as a
/// partial update. Success and error messages occupy distinct slots.
pub struct SettingsView<'a> {
    backend: &'a dyn PlantPalBackend,
    user_id: i32,
    pub form: UserUpdate,
    error: Option<String>,
    success: Option<String>,
}

impl<'a> SettingsView<'a> {
    pub fn new(backend: &'a dyn PlantPalBackend, user_id: i32) -> Self {
        Self {
            backend,
            user_id,
            form: UserUpdate::default(),
            error: None,
            success: None,
        }
    }

    /// Pre-populates the form from the stored profile.
    pub async fn load(&mut self) {
        match self.backend.get_user_profile(self.user_id).await {
            Ok(profile) => {
                self.form = UserUpdate {
                    name: profile.name,
                    email: profile.email.unwrap_or_default(),
                    zip_code: profile.zip_code.unwrap_or_default(),
                    garden_name: profile
                        .garden_name
                        .unwrap_or_else(|| "Your Garden".to_string()),
                };
            }
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load user info.");
                self.error = Some("Failed to load user info.".to_string());
            }
        }
    }

    /// Submits the form. A changed zip code is geocoded first, so an unknown
    /// zip is rejected before the profile is touched; on success the session
    /// is refreshed and the new zip is published to subscribers.
    pub async fn submit(&mut self, session: &mut Session) {
        let zip = self.form.zip_code.trim();
        if !zip.is_empty() && session.zip_code() != Some(zip) {
            match self.backend.geocode_zip(zip).await {
                Ok(point) => {
                    info!(zip, lat = point.lat, lon = point.lon, "Zip code resolved.")
                }
                Err(e) => {
                    warn!(zip, error = %e, "Zip code rejected.");
                    self.error = Some(e.to_string());
                    self.success = None;
                    return;
                }
            }
        }

        match self.backend.update_user(self.user_id, &self.form).await {
            Ok(profile) => {
                let update = SessionUpdate {
                    user_name: Some(profile.name.clone()),
                    garden_name: profile.garden_name.clone(),
                    zip_code: profile.zip_code.clone(),
                    ..SessionUpdate::default()
                };
                if let Err(e) = session.update(update) {
                    warn!(error = %e, "Account updated but the session could not be persisted.");
                }
                self.success = Some("Account updated successfully.".to_string());
                self.error = None;
            }
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to update account.");
                self.error = Some(e.to_string());
                self.success = None;
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }
}
