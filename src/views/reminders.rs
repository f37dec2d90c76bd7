use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::warn;

use super::{ItemPhase, PlantPalBackend};
use crate::models::UserPlant;

pub const MIN_FREQUENCY_DAYS: i32 = 1;
/// Longer intervals are not supported; a stated product limitation.
pub const MAX_FREQUENCY_DAYS: i32 = 7;

/// Per-plant reminder row: the schedule it mirrors plus its loading phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEntry {
    pub schedule_id: i32,
    pub frequency_days: i32,
    pub last_watered: Option<DateTime<Utc>>,
    pub phase: ItemPhase,
}

/// The watering reminder view: one cadence per owned plant plus a master
/// on/off switch for reminder notifications.
///
/// Only plants that already have a schedule appear in `entries`; every other
/// plant is offered for "create new reminder". Create and remove both bump
/// `refresh_token` and reload the whole list instead of patching it locally,
/// so server-assigned ids never have to be guessed.
pub struct RemindersView<'a> {
    backend: &'a dyn PlantPalBackend,
    user_id: i32,
    reminders_active: bool,
    loading: bool,
    plants: Vec<UserPlant>,
    entries: HashMap<i32, ReminderEntry>,
    page_error: Option<String>,
    refresh_token: u64,
}

impl<'a> RemindersView<'a> {
    pub fn new(backend: &'a dyn PlantPalBackend, user_id: i32) -> Self {
        Self {
            backend,
            user_id,
            // Default on; a failed profile fetch leaves reminders displayed as active.
            reminders_active: true,
            loading: true,
            plants: Vec::new(),
            entries: HashMap::new(),
            page_error: None,
            refresh_token: 0,
        }
    }

    /// Fetches the profile (master switch) and the plant list, rebuilding the
    /// per-plant entry map. On failure the page error is set and the loading
    /// indicator stays up.
    pub async fn load(&mut self) {
        self.loading = true;
        self.page_error = None;

        let profile = match self.backend.get_user_profile(self.user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load user profile.");
                self.page_error = Some("Failed to load reminder settings.".to_string());
                return;
            }
        };
        self.reminders_active = profile.watering_reminders_enabled;

        let plants = match self.backend.get_user_plants(self.user_id).await {
            Ok(plants) => plants,
            Err(e) => {
                warn!(user_id = self.user_id, error = %e, "Failed to load plants.");
                self.page_error = Some("Failed to load plants.".to_string());
                return;
            }
        };

        let mut entries = HashMap::new();
        for plant in &plants {
            if let Some(schedule) = &plant.watering_schedule {
                entries.insert(
                    plant.id,
                    ReminderEntry {
                        schedule_id: schedule.id,
                        frequency_days: schedule.frequency_days,
                        last_watered: schedule.last_watered,
                        phase: ItemPhase::Idle,
                    },
                );
            }
        }
        self.plants = plants;
        self.entries = entries;
        self.loading = false;
    }

    /// Flips the master switch optimistically, then persists it. On failure
    /// the flip is reverted and a page-level error is recorded.
    pub async fn toggle_reminders(&mut self) {
        let target = !self.reminders_active;
        self.reminders_active = target;

        if let Err(e) = self
            .backend
            .set_watering_reminders_enabled(self.user_id, target)
            .await
        {
            warn!(user_id = self.user_id, error = %e, "Failed to update reminder switch; reverting.");
            self.reminders_active = !target;
            self.page_error = Some(format!("Failed to update reminder setting: {e}"));
        }
    }

    /// Changes the frequency of an existing reminder. The new value is only
    /// applied to the entry once the request succeeds; on failure the prior
    /// frequency stays displayed, the error lands in the page-level slot, and
    /// the entry remains loading.
    pub async fn set_frequency(&mut self, user_plant_id: i32, days: i32) {
        if !(MIN_FREQUENCY_DAYS..=MAX_FREQUENCY_DAYS).contains(&days) {
            self.page_error = Some(format!(
                "Frequency must be between {MIN_FREQUENCY_DAYS} and {MAX_FREQUENCY_DAYS} days."
            ));
            return;
        }
        let Some(entry) = self.entries.get_mut(&user_plant_id) else {
            self.page_error = Some("This plant has no reminder yet.".to_string());
            return;
        };
        // The control is disabled while a request for this item is in flight.
        if entry.phase.is_loading() {
            return;
        }
        entry.phase.begin();
        let schedule_id = entry.schedule_id;

        match self
            .backend
            .set_schedule_frequency(schedule_id, days)
            .await
        {
            Ok(()) => {
                if let Some(entry) = self.entries.get_mut(&user_plant_id) {
                    entry.frequency_days = days;
                    entry.phase.finish();
                }
            }
            Err(e) => {
                warn!(schedule_id, error = %e, "Failed to update watering frequency.");
                self.page_error = Some(format!("Failed to update frequency: {e}"));
            }
        }
    }

    /// Validates the new-reminder form as a conjunction, aggregating every
    /// problem into one message. No request is made unless all checks pass.
    pub fn validate_new_reminder(
        plant_id: Option<i32>,
        days: Option<i32>,
    ) -> Result<(i32, i32), String> {
        let mut problems = Vec::new();

        match plant_id {
            Some(id) if id > 0 => {}
            _ => problems.push("Choose a plant."),
        }
        match days {
            None => problems.push("Enter a watering frequency."),
            Some(d) if d < MIN_FREQUENCY_DAYS => {
                problems.push("Frequency must be at least 1 day.")
            }
            Some(d) if d > MAX_FREQUENCY_DAYS => {
                problems.push("Frequencies longer than 7 days are not supported.")
            }
            Some(_) => {}
        }

        if problems.is_empty() {
            // Both unwraps guarded by the checks above; keep them implicit.
            match (plant_id, days) {
                (Some(plant_id), Some(days)) => Ok((plant_id, days)),
                _ => Err("Choose a plant. Enter a watering frequency.".to_string()),
            }
        } else {
            Err(problems.join(" "))
        }
    }

    /// Creates a reminder for a plant that has none. On success the whole list
    /// is reloaded rather than inserting the schedule optimistically.
    pub async fn create_reminder(&mut self, plant_id: Option<i32>, days: Option<i32>) {
        self.page_error = None;
        let (plant_id, days) = match Self::validate_new_reminder(plant_id, days) {
            Ok(valid) => valid,
            Err(message) => {
                self.page_error = Some(message);
                return;
            }
        };

        self.loading = true;
        match self.backend.create_schedule(plant_id, days).await {
            Ok(_) => {
                self.refresh_token += 1;
                self.load().await;
            }
            Err(e) => {
                warn!(user_plant_id = plant_id, error = %e, "Failed to create reminder.");
                self.page_error = Some(format!("Failed to create reminder: {e}"));
                self.loading = false;
            }
        }
    }

    /// Removes a plant's reminder. Success reloads the list, which drops the
    /// entry as a side effect; failure leaves the entry with its own error.
    pub async fn remove_reminder(&mut self, user_plant_id: i32) {
        let Some(entry) = self.entries.get_mut(&user_plant_id) else {
            self.page_error = Some("This plant has no reminder to remove.".to_string());
            return;
        };
        if entry.phase.is_loading() {
            return;
        }
        entry.phase.begin();
        let schedule_id = entry.schedule_id;

        match self.backend.delete_schedule(schedule_id).await {
            Ok(()) => {
                self.refresh_token += 1;
                self.load().await;
            }
            Err(e) => {
                warn!(schedule_id, error = %e, "Failed to remove reminder.");
                if let Some(entry) = self.entries.get_mut(&user_plant_id) {
                    entry.phase.fail(format!("Failed to remove reminder: {e}"));
                }
            }
        }
    }

    /// Plants without a schedule, the candidates for "create new reminder".
    pub fn unscheduled_plants(&self) -> Vec<&UserPlant> {
        self.plants
            .iter()
            .filter(|plant| !self.entries.contains_key(&plant.id))
            .collect()
    }

    pub fn reminders_active(&self) -> bool {
        self.reminders_active
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn entries(&self) -> &HashMap<i32, ReminderEntry> {
        &self.entries
    }

    pub fn plants(&self) -> &[UserPlant] {
        &self.plants
    }

    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn refresh_token(&self) -> u64 {
        self.refresh_token
    }
}
