use tokio::sync::watch;
use tracing::warn;

use super::PlantPalBackend;

/// The weather-alerts view: the master toggle plus the current-conditions
/// line, refreshed whenever the session's zip code changes.
pub struct WeatherAlertsView<'a> {
    backend: &'a dyn PlantPalBackend,
    user_id: i32,
    zip_rx: watch::Receiver<Option<String>>,
    alerts_active: bool,
    weather_summary: Option<String>,
    error: Option<String>,
}

impl<'a> WeatherAlertsView<'a> {
    pub fn new(
        backend: &'a dyn PlantPalBackend,
        user_id: i32,
        zip_rx: watch::Receiver<Option<String>>,
    ) -> Self {
        Self {
            backend,
            user_id,
            zip_rx,
            alerts_active: true,
            weather_summary: None,
            error: None,
        }
    }

    /// Loads the toggle state from the profile and the conditions for the
    /// current zip code.
    pub async fn load(&mut self) {
        match self.backend.get_user_profile(self.user_id).await {
            Ok(profile) => self.alerts_active = profile.weather_alerts_enabled,
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load user info.");
                self.error = Some("Failed to load user info.".to_string());
            }
        }

        let zip = self.zip_rx.borrow_and_update().clone();
        if let Some(zip) = zip {
            self.fetch_weather(&zip).await;
        }
    }

    /// Re-fetches the conditions if the zip code changed since the last check.
    pub async fn refresh_if_zip_changed(&mut self) {
        if !self.zip_rx.has_changed().unwrap_or(false) {
            return;
        }
        let zip = self.zip_rx.borrow_and_update().clone();
        match zip {
            Some(zip) => self.fetch_weather(&zip).await,
            None => self.weather_summary = None,
        }
    }

    /// Flips the master toggle optimistically and reverts it if the server
    /// rejects the change.
    pub async fn toggle_alerts(&mut self) {
        let desired = !self.alerts_active;
        self.alerts_active = desired;
        match self
            .backend
            .set_weather_alerts_enabled(self.user_id, desired)
            .await
        {
            Ok(profile) => {
                self.alerts_active = profile.weather_alerts_enabled;
                self.error = None;
            }
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to update weather alerts.");
                self.alerts_active = !desired;
                self.error = Some("Failed to update weather alerts.".to_string());
            }
        }
    }

    async fn fetch_weather(&mut self, zip: &str) {
        match self.backend.get_weather(zip).await {
            Ok(report) => self.weather_summary = Some(report.summary()),
            Err(e) => warn!(zip, error = %e, "Failed to fetch weather."),
        }
    }

    pub fn alerts_active(&self) -> bool {
        self.alerts_active
    }

    pub fn weather_summary(&self) -> Option<&str> {
        self.weather_summary.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
