use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// A user account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub zip_code: Option<String>,
    pub garden_name: Option<String>,
    #[serde(default = "default_true")]
    pub watering_reminders_enabled: bool,
    #[serde(default = "default_true")]
    pub weather_alerts_enabled: bool,
}

/// Form data for account creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub zip_code: String,
    pub garden_name: String,
}

/// Settings-form fields. Empty strings mean "leave unchanged" and are not sent.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub zip_code: String,
    pub garden_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// A catalog plant (species-level reference data, never mutated by the client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantInfo {
    pub id: i32,
    pub scientific_name: String,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub preferred_soil_conditions: String,
    #[serde(default)]
    pub propagation_methods: String,
    #[serde(default)]
    pub edible_parts: String,
    #[serde(default)]
    pub is_pet_safe: bool,
    #[serde(default)]
    pub image_url: String,
}

/// Catalog fields suggested by the AI lookup for a scientific name. All fields
/// are optional on the wire; missing ones stay empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantSuggestion {
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub preferred_soil_conditions: String,
    #[serde(default)]
    pub propagation_methods: String,
    #[serde(default)]
    pub edible_parts: String,
    #[serde(default)]
    pub is_pet_safe: bool,
    #[serde(default)]
    pub image_url: String,
}

/// The one-to-one watering cadence record for a [`UserPlant`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WateringSchedule {
    pub id: i32,
    pub user_plant_id: i32,
    pub frequency_days: i32,
    #[serde(default)]
    pub last_watered: Option<DateTime<Utc>>,
}

/// A user's ownership record of a plant, with nested catalog info, tags and an
/// optional watering schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlant {
    pub id: i32,
    pub user_id: i32,
    pub plant_id: i32,
    pub is_outdoor: bool,
    pub planted_date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub plant: PlantInfo,
    #[serde(default)]
    pub watering_schedule: Option<WateringSchedule>,
}

/// Payload for creating or replacing a [`UserPlant`]. Catalog fields are sent
/// alongside so the backend can create the catalog entry when `plant_id` is
/// not yet known (AI-autofilled plants).
#[derive(Debug, Clone, Serialize)]
pub struct UserPlantInput {
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<i32>,
    pub scientific_name: String,
    pub common_name: String,
    pub species: String,
    pub preferred_soil_conditions: String,
    pub propagation_methods: String,
    pub edible_parts: String,
    pub is_pet_safe: bool,
    pub image_url: String,
    pub is_outdoor: bool,
    pub planted_date: NaiveDate,
    pub tag_ids: Vec<i32>,
}

/// Current conditions for a zip code.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReport {
    pub temp: f64,
    pub description: String,
    pub zip_code: String,
}

impl WeatherReport {
    pub fn summary(&self) -> String {
        format!("{}°F and {} in {}", self.temp, self.description, self.zip_code)
    }
}

/// Coordinates for a zip code.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeocodePoint {
    pub lat: f64,
    pub lon: f64,
}

impl UserPlant {
    /// Common name when present, falling back to the scientific name.
    pub fn display_name(&self) -> &str {
        if self.plant.common_name.trim().is_empty() {
            &self.plant.scientific_name
        } else {
            &self.plant.common_name
        }
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Case-insensitive substring match against common or scientific name.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.plant.common_name.to_lowercase().contains(&term)
            || self.plant.scientific_name.to_lowercase().contains(&term)
    }

    pub fn needs_water_on(&self, today: NaiveDate) -> bool {
        needs_water_on(self.watering_schedule.as_ref(), today)
    }
}

/// Whether a plant with the given schedule needs water on `today`.
///
/// No schedule, or a schedule that has never been watered, counts as needing
/// water. Otherwise the check is day-of-week based: watering is due on the
/// weekday the plant was last watered and on the weekday `frequency_days`
/// later (wrapping the week). This repeats every 7 days by construction and is
/// a known coarse approximation, kept deliberately.
pub fn needs_water_on(schedule: Option<&WateringSchedule>, today: NaiveDate) -> bool {
    let Some(schedule) = schedule else {
        return true;
    };
    let Some(last_watered) = schedule.last_watered else {
        return true;
    };

    let last_day = last_watered.date_naive().weekday().num_days_from_sunday() as i32;
    let today_day = today.weekday().num_days_from_sunday() as i32;
    let next_day = (last_day + schedule.frequency_days).rem_euclid(7);

    last_day == today_day || next_day == today_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule(frequency_days: i32, last_watered: Option<DateTime<Utc>>) -> WateringSchedule {
        WateringSchedule {
            id: 1,
            user_plant_id: 1,
            frequency_days,
            last_watered,
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_schedule_needs_water() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(needs_water_on(None, today));
    }

    #[test]
    fn never_watered_needs_water_regardless_of_frequency() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        for frequency in 1..=7 {
            assert!(needs_water_on(Some(&schedule(frequency, None)), today));
        }
    }

    #[test]
    fn due_on_the_weekday_frequency_days_after_last_watering() {
        // 2025-06-02 is a Monday; watering every 3 days => due Thursday.
        let s = schedule(3, Some(utc(2025, 6, 2)));
        let thursday = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2025, 6, 4).unwrap();
        assert!(needs_water_on(Some(&s), thursday));
        assert!(!needs_water_on(Some(&s), wednesday));
    }

    #[test]
    fn due_again_on_the_last_watered_weekday() {
        // The predicate is weekly-periodic: the last-watered weekday matches too.
        let s = schedule(3, Some(utc(2025, 6, 2)));
        let next_monday = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert!(needs_water_on(Some(&s), next_monday));
    }

    #[test]
    fn weekday_arithmetic_wraps_the_week() {
        // 2025-06-07 is a Saturday; +3 days wraps to Tuesday.
        let s = schedule(3, Some(utc(2025, 6, 7)));
        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert!(needs_water_on(Some(&s), tuesday));
    }

    #[test]
    fn display_name_falls_back_to_scientific_name() {
        let mut plant = UserPlant {
            id: 1,
            user_id: 1,
            plant_id: 1,
            is_outdoor: false,
            planted_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            tags: vec![],
            plant: PlantInfo {
                id: 1,
                scientific_name: "Monstera deliciosa".to_string(),
                common_name: String::new(),
                species: String::new(),
                preferred_soil_conditions: String::new(),
                propagation_methods: String::new(),
                edible_parts: String::new(),
                is_pet_safe: false,
                image_url: String::new(),
            },
            watering_schedule: None,
        };
        assert_eq!(plant.display_name(), "Monstera deliciosa");
        plant.plant.common_name = "Swiss cheese plant".to_string();
        assert_eq!(plant.display_name(), "Swiss cheese plant");
    }

    #[test]
    fn search_matches_either_name_case_insensitively() {
        let plant = UserPlant {
            id: 1,
            user_id: 1,
            plant_id: 1,
            is_outdoor: false,
            planted_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            tags: vec![Tag {
                id: 1,
                name: "kitchen".to_string(),
            }],
            plant: PlantInfo {
                id: 1,
                scientific_name: "Ocimum basilicum".to_string(),
                common_name: "Basil".to_string(),
                species: String::new(),
                preferred_soil_conditions: String::new(),
                propagation_methods: String::new(),
                edible_parts: String::new(),
                is_pet_safe: true,
                image_url: String::new(),
            },
            watering_schedule: None,
        };
        assert!(plant.matches_search("basil"));
        assert!(plant.matches_search("OCIMUM"));
        assert!(!plant.matches_search("fern"));
        assert!(plant.has_tag("kitchen"));
        assert!(!plant.has_tag("balcony"));
    }
}
