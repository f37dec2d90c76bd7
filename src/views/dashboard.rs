use chrono::NaiveDate;
use tracing::warn;

use super::PlantPalBackend;
use crate::models::{Tag, UserPlant};
use crate::session::{Session, SessionUpdate};

/// The dashboard: the cached plant list plus purely derived filtering, the
/// "water today" strip and a weather summary line.
pub struct DashboardView<'a> {
    backend: &'a dyn PlantPalBackend,
    user_id: i32,
    plants: Vec<UserPlant>,
    all_tags: Vec<Tag>,
    search_term: String,
    selected_tag: Option<String>,
    weather_summary: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl<'a> DashboardView<'a> {
    pub fn new(backend: &'a dyn PlantPalBackend, user_id: i32) -> Self {
        Self {
            backend,
            user_id,
            plants: Vec::new(),
            all_tags: Vec::new(),
            search_term: String::new(),
            selected_tag: None,
            weather_summary: None,
            error: None,
            loading: true,
        }
    }

    /// Loads the plant list (page error on failure) and the tag list (failure
    /// only logged; filtering simply offers no tags).
    pub async fn load(&mut self) {
        self.loading = true;
        match self.backend.get_user_plants(self.user_id).await {
            Ok(plants) => {
                self.plants = plants;
                self.error = None;
                self.loading = false;
            }
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load plants.");
                self.error = Some("Failed to load plants.".to_string());
                self.loading = false;
            }
        }

        match self.backend.get_all_tags().await {
            Ok(tags) => self.all_tags = tags,
            Err(e) => warn!(error = %e, "Failed to fetch tags."),
        }
    }

    /// Back-fills the session's display name and garden name from the profile
    /// when they are missing (e.g. after signing in on another machine).
    pub async fn refresh_session_names(&self, session: &mut Session) {
        if session.user_name().is_some() && session.garden_name().is_some() {
            return;
        }
        match self.backend.get_user_profile(self.user_id).await {
            Ok(profile) => {
                let update = SessionUpdate {
                    user_name: Some(profile.name),
                    garden_name: profile.garden_name,
                    ..SessionUpdate::default()
                };
                if let Err(e) = session.update(update) {
                    warn!(error = %e, "Failed to persist session names.");
                }
            }
            Err(e) => warn!(error = %e, "Failed to fetch user profile."),
        }
    }

    /// Fetches the weather line for a zip code. Failures are logged and leave
    /// the previous summary in place; the dashboard never fails over weather.
    pub async fn load_weather(&mut self, zip: &str) {
        match self.backend.get_weather(zip).await {
            Ok(report) => self.weather_summary = Some(report.summary()),
            Err(e) => warn!(zip, error = %e, "Failed to fetch weather."),
        }
    }

    /// Re-fetches the weather line if the session zip changed since the last
    /// check on the given subscription.
    pub async fn refresh_weather_if_zip_changed(
        &mut self,
        zip_rx: &mut tokio::sync::watch::Receiver<Option<String>>,
    ) {
        if !zip_rx.has_changed().unwrap_or(false) {
            return;
        }
        let zip = zip_rx.borrow_and_update().clone();
        match zip {
            Some(zip) => self.load_weather(&zip).await,
            None => self.weather_summary = None,
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_tag_filter(&mut self, tag: Option<String>) {
        self.selected_tag = tag;
    }

    /// The cached list filtered by search term and/or selected tag. Derived on
    /// demand; no network effect.
    pub fn filtered_plants(&self) -> Vec<&UserPlant> {
        self.plants
            .iter()
            .filter(|plant| {
                self.search_term.trim().is_empty() || plant.matches_search(self.search_term.trim())
            })
            .filter(|plant| match &self.selected_tag {
                Some(tag) => plant.has_tag(tag),
                None => true,
            })
            .collect()
    }

    /// Plants due for water today. Only scheduled plants are listed here; the
    /// shared predicate also reports schedule-less plants as thirsty, but they
    /// have no cadence to display.
    pub fn water_today(&self, today: NaiveDate) -> Vec<&UserPlant> {
        self.plants
            .iter()
            .filter(|plant| plant.watering_schedule.is_some() && plant.needs_water_on(today))
            .collect()
    }

    /// Deletes a plant. Confirmation happens at the call site; on success the
    /// plant is dropped from the cached list.
    pub async fn delete_plant(&mut self, plant_id: i32) {
        match self.backend.delete_user_plant(plant_id).await {
            Ok(()) => self.plants.retain(|plant| plant.id != plant_id),
            Err(e) => {
                warn!(plant_id, error = %e, "Failed to delete plant.");
                self.error = Some("Failed to delete plant.".to_string());
            }
        }
    }

    pub fn plants(&self) -> &[UserPlant] {
        &self.plants
    }

    pub fn all_tags(&self) -> &[Tag] {
        &self.all_tags
    }

    pub fn weather_summary(&self) -> Option<&str> {
        self.weather_summary.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tag, WeatherReport};
    use crate::views::testing::{plant, profile, schedule, Call, FakeBackend};
    use chrono::{TimeZone, Utc};

    fn backend() -> FakeBackend {
        let watered_monday = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let mut basil = plant(
            1,
            1,
            "Basil",
            "Ocimum basilicum",
            Some(schedule(10, 1, 3, Some(watered_monday))),
        );
        basil.tags.push(Tag {
            id: 1,
            name: "kitchen".to_string(),
        });
        let monstera = plant(2, 1, "Monstera", "Monstera deliciosa", None);
        let ivy = plant(3, 1, "", "Hedera helix", Some(schedule(11, 3, 2, None)));
        FakeBackend::new(profile(1), vec![basil, monstera, ivy])
    }

    #[tokio::test]
    async fn search_filters_by_either_name_case_insensitively() {
        let backend = backend();
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        view.set_search_term("basil");
        let ids: Vec<i32> = view.filtered_plants().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        view.set_search_term("HEDERA");
        let ids: Vec<i32> = view.filtered_plants().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);

        view.set_search_term("");
        assert_eq!(view.filtered_plants().len(), 3);
    }

    #[tokio::test]
    async fn tag_filter_composes_with_search() {
        let backend = backend();
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        view.set_tag_filter(Some("kitchen".to_string()));
        let ids: Vec<i32> = view.filtered_plants().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        view.set_search_term("monstera");
        assert!(view.filtered_plants().is_empty());
    }

    #[tokio::test]
    async fn water_today_lists_due_and_never_watered_scheduled_plants() {
        let backend = backend();
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        // Thursday 2025-06-05: basil (watered Monday, every 3 days) is due,
        // ivy has never been watered, monstera has no schedule at all.
        let thursday = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let ids: Vec<i32> = view.water_today(thursday).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let wednesday = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        let ids: Vec<i32> = view.water_today(wednesday).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[tokio::test]
    async fn load_failure_sets_page_error() {
        let backend = backend();
        backend.fail_on("get_user_plants");
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        assert_eq!(view.error(), Some("Failed to load plants."));
        assert!(view.plants().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_plant_from_cache_on_success() {
        let backend = backend();
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        view.delete_plant(2).await;

        assert_eq!(
            backend.calls_matching(|c| matches!(c, Call::DeleteUserPlant { id: 2 })),
            1
        );
        assert!(view.plants().iter().all(|p| p.id != 2));
    }

    #[tokio::test]
    async fn delete_failure_keeps_plant_and_sets_error() {
        let backend = backend();
        backend.fail_on("delete_user_plant");
        let mut view = DashboardView::new(&backend, 1);
        view.load().await;

        view.delete_plant(2).await;

        assert!(view.plants().iter().any(|p| p.id == 2));
        assert_eq!(view.error(), Some("Failed to delete plant."));
    }

    #[tokio::test]
    async fn zip_change_refreshes_the_weather_line() {
        let backend = backend();
        *backend.weather.lock().unwrap() = Some(WeatherReport {
            temp: 72.0,
            description: "clear sky".to_string(),
            zip_code: "97210".to_string(),
        });
        let (tx, mut rx) = tokio::sync::watch::channel(Some("97210".to_string()));
        let mut view = DashboardView::new(&backend, 1);
        view.load_weather("97210").await;
        rx.borrow_and_update();

        view.refresh_weather_if_zip_changed(&mut rx).await;
        assert_eq!(
            backend.calls_matching(|c| matches!(c, Call::GetWeather { .. })),
            1
        );

        *backend.weather.lock().unwrap() = Some(WeatherReport {
            temp: 58.0,
            description: "light rain".to_string(),
            zip_code: "02134".to_string(),
        });
        tx.send(Some("02134".to_string())).unwrap();
        view.refresh_weather_if_zip_changed(&mut rx).await;

        assert_eq!(view.weather_summary(), Some("58°F and light rain in 02134"));
    }

    #[tokio::test]
    async fn weather_summary_renders_the_report() {
        let backend = backend();
        *backend.weather.lock().unwrap() = Some(WeatherReport {
            temp: 72.0,
            description: "clear sky".to_string(),
            zip_code: "97210".to_string(),
        });
        let mut view = DashboardView::new(&backend, 1);
        view.load_weather("97210").await;

        assert_eq!(view.weather_summary(), Some("72°F and clear sky in 97210"));
    }
}
