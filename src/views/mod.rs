use async_trait::async_trait;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{
    GeocodePoint, NewUser, PlantInfo, PlantSuggestion, Tag, UserPlant, UserPlantInput,
    UserProfile, UserUpdate, WateringSchedule, WeatherReport,
};

pub mod account;
pub mod dashboard;
pub mod plant_form;
pub mod reminders;
pub mod weather_alerts;

/// Loading/error phase of a single list item. Transitions are plain value
/// replacements, so per-item behavior is testable without any network.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemPhase {
    #[default]
    Idle,
    Loading,
    Error(String),
}

impl ItemPhase {
    pub fn begin(&mut self) {
        *self = ItemPhase::Loading;
    }

    pub fn finish(&mut self) {
        *self = ItemPhase::Idle;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = ItemPhase::Error(message.into());
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ItemPhase::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ItemPhase::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the views need from the backend, as one seam so view logic can
/// be exercised against an in-memory fake in tests.
#[async_trait]
pub trait PlantPalBackend: Send + Sync {
    async fn get_user_profile(&self, user_id: i32) -> Result<UserProfile, ApiError>;
    async fn login(&self, email: &str) -> Result<UserProfile, ApiError>;
    async fn create_user(&self, new_user: &NewUser) -> Result<UserProfile, ApiError>;
    async fn update_user(&self, user_id: i32, form: &UserUpdate) -> Result<UserProfile, ApiError>;
    async fn geocode_zip(&self, zip: &str) -> Result<GeocodePoint, ApiError>;
    async fn set_watering_reminders_enabled(
        &self,
        user_id: i32,
        enabled: bool,
    ) -> Result<UserProfile, ApiError>;
    async fn set_weather_alerts_enabled(
        &self,
        user_id: i32,
        enabled: bool,
    ) -> Result<UserProfile, ApiError>;
    async fn delete_user(&self, user_id: i32) -> Result<(), ApiError>;

    async fn get_catalog_plants(&self) -> Result<Vec<PlantInfo>, ApiError>;
    async fn get_user_plants(&self, user_id: i32) -> Result<Vec<UserPlant>, ApiError>;
    async fn get_user_plant_by_id(&self, id: i32) -> Result<UserPlant, ApiError>;
    async fn create_user_plant(&self, input: &UserPlantInput) -> Result<UserPlant, ApiError>;
    async fn update_user_plant(&self, id: i32, input: &UserPlantInput) -> Result<(), ApiError>;
    async fn delete_user_plant(&self, id: i32) -> Result<(), ApiError>;

    async fn get_all_tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn create_tag(&self, name: &str) -> Result<Tag, ApiError>;
    async fn delete_tag(&self, id: i32) -> Result<(), ApiError>;

    async fn create_schedule(
        &self,
        user_plant_id: i32,
        frequency_days: i32,
    ) -> Result<WateringSchedule, ApiError>;
    async fn set_schedule_frequency(
        &self,
        schedule_id: i32,
        frequency_days: i32,
    ) -> Result<(), ApiError>;
    async fn delete_schedule(&self, schedule_id: i32) -> Result<(), ApiError>;

    async fn get_weather(&self, zip: &str) -> Result<WeatherReport, ApiError>;
    async fn fetch_plant_info(&self, scientific_name: &str) -> Result<PlantSuggestion, ApiError>;
    async fn fetch_name_suggestions(&self, partial_name: &str) -> Result<Vec<String>, ApiError>;
}

#[async_trait]
impl PlantPalBackend for ApiClient {
    async fn get_user_profile(&self, user_id: i32) -> Result<UserProfile, ApiError> {
        api::users::get_user_profile(self, user_id).await
    }

    async fn login(&self, email: &str) -> Result<UserProfile, ApiError> {
        api::users::login(self, email).await
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<UserProfile, ApiError> {
        api::users::create_user(self, new_user).await
    }

    async fn update_user(&self, user_id: i32, form: &UserUpdate) -> Result<UserProfile, ApiError> {
        api::users::update_user(self, user_id, form).await
    }

    async fn geocode_zip(&self, zip: &str) -> Result<GeocodePoint, ApiError> {
        api::weather::geocode_zip(self, zip).await
    }

    async fn set_watering_reminders_enabled(
        &self,
        user_id: i32,
        enabled: bool,
    ) -> Result<UserProfile, ApiError> {
        api::users::update_user_flag(self, user_id, "watering_reminders_enabled", enabled).await
    }

    async fn set_weather_alerts_enabled(
        &self,
        user_id: i32,
        enabled: bool,
    ) -> Result<UserProfile, ApiError> {
        api::users::update_user_flag(self, user_id, "weather_alerts_enabled", enabled).await
    }

    async fn delete_user(&self, user_id: i32) -> Result<(), ApiError> {
        api::users::delete_user(self, user_id).await
    }

    async fn get_catalog_plants(&self) -> Result<Vec<PlantInfo>, ApiError> {
        api::plants::get_catalog_plants(self).await
    }

    async fn get_user_plants(&self, user_id: i32) -> Result<Vec<UserPlant>, ApiError> {
        api::plants::get_user_plants(self, user_id).await
    }

    async fn get_user_plant_by_id(&self, id: i32) -> Result<UserPlant, ApiError> {
        api::plants::get_user_plant_by_id(self, id).await
    }

    async fn create_user_plant(&self, input: &UserPlantInput) -> Result<UserPlant, ApiError> {
        api::plants::create_user_plant(self, input).await
    }

    async fn update_user_plant(&self, id: i32, input: &UserPlantInput) -> Result<(), ApiError> {
        api::plants::update_user_plant(self, id, input).await
    }

    async fn delete_user_plant(&self, id: i32) -> Result<(), ApiError> {
        api::plants::delete_user_plant(self, id).await
    }

    async fn get_all_tags(&self) -> Result<Vec<Tag>, ApiError> {
        api::tags::get_all_tags(self).await
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        api::tags::create_tag(self, name).await
    }

    async fn delete_tag(&self, id: i32) -> Result<(), ApiError> {
        api::tags::delete_tag(self, id).await
    }

    async fn create_schedule(
        &self,
        user_plant_id: i32,
        frequency_days: i32,
    ) -> Result<WateringSchedule, ApiError> {
        api::watering::create_schedule(self, user_plant_id, frequency_days).await
    }

    async fn set_schedule_frequency(
        &self,
        schedule_id: i32,
        frequency_days: i32,
    ) -> Result<(), ApiError> {
        api::watering::set_schedule_frequency(self, schedule_id, frequency_days).await
    }

    async fn delete_schedule(&self, schedule_id: i32) -> Result<(), ApiError> {
        api::watering::delete_schedule(self, schedule_id).await
    }

    async fn get_weather(&self, zip: &str) -> Result<WeatherReport, ApiError> {
        api::weather::get_weather(self, zip).await
    }

    async fn fetch_plant_info(&self, scientific_name: &str) -> Result<PlantSuggestion, ApiError> {
        api::gemini::fetch_plant_info(self, scientific_name).await
    }

    async fn fetch_name_suggestions(&self, partial_name: &str) -> Result<Vec<String>, ApiError> {
        api::gemini::fetch_name_suggestions(self, partial_name).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Mutating/observable backend calls, recorded with their payloads so
    /// scenario tests can assert exactly what was sent.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        GetUserProfile { user_id: i32 },
        GetUserPlants { user_id: i32 },
        Login { email: String },
        CreateUser { email: String },
        UpdateUser { user_id: i32 },
        GeocodeZip { zip: String },
        SetWateringRemindersEnabled { user_id: i32, enabled: bool },
        SetWeatherAlertsEnabled { user_id: i32, enabled: bool },
        DeleteUser { user_id: i32 },
        GetCatalogPlants,
        GetUserPlantById { id: i32 },
        CreateUserPlant { scientific_name: String },
        UpdateUserPlant { id: i32 },
        DeleteUserPlant { id: i32 },
        GetAllTags,
        CreateTag { name: String },
        DeleteTag { id: i32 },
        CreateSchedule { user_plant_id: i32, frequency_days: i32 },
        SetScheduleFrequency { schedule_id: i32, frequency_days: i32 },
        DeleteSchedule { schedule_id: i32 },
        GetWeather { zip: String },
        FetchPlantInfo { scientific_name: String },
        FetchNameSuggestions { partial_name: String },
    }

    /// In-memory backend: serves fixture data, applies mutations to it, and
    /// records every call. Individual methods can be forced to fail.
    pub(crate) struct FakeBackend {
        pub profile: Mutex<UserProfile>,
        pub plants: Mutex<Vec<UserPlant>>,
        pub tags: Mutex<Vec<Tag>>,
        pub catalog: Mutex<Vec<PlantInfo>>,
        pub weather: Mutex<Option<WeatherReport>>,
        pub plant_info: Mutex<PlantSuggestion>,
        pub suggestions: Mutex<Vec<String>>,
        pub calls: Mutex<Vec<Call>>,
        failing: Mutex<HashSet<&'static str>>,
        next_schedule_id: Mutex<i32>,
    }

    impl FakeBackend {
        pub fn new(profile: UserProfile, plants: Vec<UserPlant>) -> Self {
            Self {
                profile: Mutex::new(profile),
                plants: Mutex::new(plants),
                tags: Mutex::new(Vec::new()),
                catalog: Mutex::new(Vec::new()),
                weather: Mutex::new(None),
                plant_info: Mutex::new(PlantSuggestion::default()),
                suggestions: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
                failing: Mutex::new(HashSet::new()),
                next_schedule_id: Mutex::new(1000),
            }
        }

        pub fn fail_on(&self, method: &'static str) {
            self.failing.lock().unwrap().insert(method);
        }

        pub fn stop_failing(&self, method: &'static str) {
            self.failing.lock().unwrap().remove(method);
        }

        pub fn calls_matching(&self, predicate: impl Fn(&Call) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn check(&self, method: &'static str) -> Result<(), ApiError> {
            if self.failing.lock().unwrap().contains(method) {
                Err(ApiError::Api {
                    status: 500,
                    details: format!("{method} failed"),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PlantPalBackend for FakeBackend {
        async fn get_user_profile(&self, user_id: i32) -> Result<UserProfile, ApiError> {
            self.record(Call::GetUserProfile { user_id });
            self.check("get_user_profile")?;
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn login(&self, email: &str) -> Result<UserProfile, ApiError> {
            self.record(Call::Login {
                email: email.to_string(),
            });
            self.check("login")?;
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn create_user(&self, new_user: &NewUser) -> Result<UserProfile, ApiError> {
            self.record(Call::CreateUser {
                email: new_user.email.clone(),
            });
            self.check("create_user")?;
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn update_user(
            &self,
            user_id: i32,
            form: &UserUpdate,
        ) -> Result<UserProfile, ApiError> {
            self.record(Call::UpdateUser { user_id });
            self.check("update_user")?;
            let mut profile = self.profile.lock().unwrap();
            if !form.name.is_empty() {
                profile.name = form.name.clone();
            }
            if !form.email.is_empty() {
                profile.email = Some(form.email.clone());
            }
            if !form.garden_name.is_empty() {
                profile.garden_name = Some(form.garden_name.clone());
            }
            if !form.zip_code.is_empty() {
                profile.zip_code = Some(form.zip_code.clone());
            }
            Ok(profile.clone())
        }

        async fn geocode_zip(&self, zip: &str) -> Result<GeocodePoint, ApiError> {
            self.record(Call::GeocodeZip {
                zip: zip.to_string(),
            });
            self.check("geocode_zip")?;
            Ok(GeocodePoint {
                lat: 45.53,
                lon: -122.7,
            })
        }

        async fn set_watering_reminders_enabled(
            &self,
            user_id: i32,
            enabled: bool,
        ) -> Result<UserProfile, ApiError> {
            self.record(Call::SetWateringRemindersEnabled { user_id, enabled });
            self.check("set_watering_reminders_enabled")?;
            let mut profile = self.profile.lock().unwrap();
            profile.watering_reminders_enabled = enabled;
            Ok(profile.clone())
        }

        async fn set_weather_alerts_enabled(
            &self,
            user_id: i32,
            enabled: bool,
        ) -> Result<UserProfile, ApiError> {
            self.record(Call::SetWeatherAlertsEnabled { user_id, enabled });
            self.check("set_weather_alerts_enabled")?;
            let mut profile = self.profile.lock().unwrap();
            profile.weather_alerts_enabled = enabled;
            Ok(profile.clone())
        }

        async fn delete_user(&self, user_id: i32) -> Result<(), ApiError> {
            self.record(Call::DeleteUser { user_id });
            self.check("delete_user")
        }

        async fn get_catalog_plants(&self) -> Result<Vec<PlantInfo>, ApiError> {
            self.record(Call::GetCatalogPlants);
            self.check("get_catalog_plants")?;
            Ok(self.catalog.lock().unwrap().clone())
        }

        async fn get_user_plants(&self, user_id: i32) -> Result<Vec<UserPlant>, ApiError> {
            self.record(Call::GetUserPlants { user_id });
            self.check("get_user_plants")?;
            Ok(self.plants.lock().unwrap().clone())
        }

        async fn get_user_plant_by_id(&self, id: i32) -> Result<UserPlant, ApiError> {
            self.record(Call::GetUserPlantById { id });
            self.check("get_user_plant_by_id")?;
            self.plants
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(ApiError::Api {
                    status: 404,
                    details: "User plant not found".to_string(),
                })
        }

        async fn create_user_plant(&self, input: &UserPlantInput) -> Result<UserPlant, ApiError> {
            self.record(Call::CreateUserPlant {
                scientific_name: input.scientific_name.clone(),
            });
            self.check("create_user_plant")?;
            let plant = UserPlant {
                id: 900,
                user_id: input.user_id,
                plant_id: input.plant_id.unwrap_or(901),
                is_outdoor: input.is_outdoor,
                planted_date: input.planted_date,
                tags: Vec::new(),
                plant: PlantInfo {
                    id: input.plant_id.unwrap_or(901),
                    scientific_name: input.scientific_name.clone(),
                    common_name: input.common_name.clone(),
                    species: input.species.clone(),
                    preferred_soil_conditions: input.preferred_soil_conditions.clone(),
                    propagation_methods: input.propagation_methods.clone(),
                    edible_parts: input.edible_parts.clone(),
                    is_pet_safe: input.is_pet_safe,
                    image_url: input.image_url.clone(),
                },
                watering_schedule: None,
            };
            self.plants.lock().unwrap().push(plant.clone());
            Ok(plant)
        }

        async fn update_user_plant(&self, id: i32, _input: &UserPlantInput) -> Result<(), ApiError> {
            self.record(Call::UpdateUserPlant { id });
            self.check("update_user_plant")
        }

        async fn delete_user_plant(&self, id: i32) -> Result<(), ApiError> {
            self.record(Call::DeleteUserPlant { id });
            self.check("delete_user_plant")?;
            self.plants.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }

        async fn get_all_tags(&self) -> Result<Vec<Tag>, ApiError> {
            self.record(Call::GetAllTags);
            self.check("get_all_tags")?;
            Ok(self.tags.lock().unwrap().clone())
        }

        async fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
            self.record(Call::CreateTag {
                name: name.to_string(),
            });
            self.check("create_tag")?;
            let mut tags = self.tags.lock().unwrap();
            let id = tags.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            let tag = Tag {
                id,
                name: name.to_string(),
            };
            tags.push(tag.clone());
            Ok(tag)
        }

        async fn delete_tag(&self, id: i32) -> Result<(), ApiError> {
            self.record(Call::DeleteTag { id });
            self.check("delete_tag")?;
            self.tags.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }

        async fn create_schedule(
            &self,
            user_plant_id: i32,
            frequency_days: i32,
        ) -> Result<WateringSchedule, ApiError> {
            self.record(Call::CreateSchedule {
                user_plant_id,
                frequency_days,
            });
            self.check("create_schedule")?;
            let mut next_id = self.next_schedule_id.lock().unwrap();
            *next_id += 1;
            let schedule = WateringSchedule {
                id: *next_id,
                user_plant_id,
                frequency_days,
                last_watered: None,
            };
            let mut plants = self.plants.lock().unwrap();
            if let Some(plant) = plants.iter_mut().find(|p| p.id == user_plant_id) {
                plant.watering_schedule = Some(schedule.clone());
            }
            Ok(schedule)
        }

        async fn set_schedule_frequency(
            &self,
            schedule_id: i32,
            frequency_days: i32,
        ) -> Result<(), ApiError> {
            self.record(Call::SetScheduleFrequency {
                schedule_id,
                frequency_days,
            });
            self.check("set_schedule_frequency")?;
            let mut plants = self.plants.lock().unwrap();
            for plant in plants.iter_mut() {
                if let Some(schedule) = plant.watering_schedule.as_mut() {
                    if schedule.id == schedule_id {
                        schedule.frequency_days = frequency_days;
                    }
                }
            }
            Ok(())
        }

        async fn delete_schedule(&self, schedule_id: i32) -> Result<(), ApiError> {
            self.record(Call::DeleteSchedule { schedule_id });
            self.check("delete_schedule")?;
            let mut plants = self.plants.lock().unwrap();
            for plant in plants.iter_mut() {
                if plant
                    .watering_schedule
                    .as_ref()
                    .is_some_and(|s| s.id == schedule_id)
                {
                    plant.watering_schedule = None;
                }
            }
            Ok(())
        }

        async fn get_weather(&self, zip: &str) -> Result<WeatherReport, ApiError> {
            self.record(Call::GetWeather {
                zip: zip.to_string(),
            });
            self.check("get_weather")?;
            self.weather
                .lock()
                .unwrap()
                .clone()
                .ok_or(ApiError::InvalidResponse("no weather fixture".to_string()))
        }

        async fn fetch_plant_info(
            &self,
            scientific_name: &str,
        ) -> Result<PlantSuggestion, ApiError> {
            self.record(Call::FetchPlantInfo {
                scientific_name: scientific_name.to_string(),
            });
            self.check("fetch_plant_info")?;
            Ok(self.plant_info.lock().unwrap().clone())
        }

        async fn fetch_name_suggestions(&self, partial_name: &str) -> Result<Vec<String>, ApiError> {
            self.record(Call::FetchNameSuggestions {
                partial_name: partial_name.to_string(),
            });
            self.check("fetch_name_suggestions")?;
            Ok(self.suggestions.lock().unwrap().clone())
        }
    }

    // --- Fixtures ---

    pub(crate) fn profile(user_id: i32) -> UserProfile {
        UserProfile {
            id: user_id,
            name: "Fern".to_string(),
            email: Some("fern@example.com".to_string()),
            zip_code: Some("97210".to_string()),
            garden_name: Some("Back Porch".to_string()),
            watering_reminders_enabled: true,
            weather_alerts_enabled: true,
        }
    }

    pub(crate) fn schedule(
        id: i32,
        user_plant_id: i32,
        frequency_days: i32,
        last_watered: Option<DateTime<Utc>>,
    ) -> WateringSchedule {
        WateringSchedule {
            id,
            user_plant_id,
            frequency_days,
            last_watered,
        }
    }

    pub(crate) fn plant(
        id: i32,
        user_id: i32,
        common_name: &str,
        scientific_name: &str,
        watering_schedule: Option<WateringSchedule>,
    ) -> UserPlant {
        UserPlant {
            id,
            user_id,
            plant_id: id * 10,
            is_outdoor: false,
            planted_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            tags: Vec::new(),
            plant: PlantInfo {
                id: id * 10,
                scientific_name: scientific_name.to_string(),
                common_name: common_name.to_string(),
                species: String::new(),
                preferred_soil_conditions: String::new(),
                propagation_methods: String::new(),
                edible_parts: String::new(),
                is_pet_safe: false,
                image_url: String::new(),
            },
            watering_schedule,
        }
    }

    #[test]
    fn item_phase_transitions() {
        let mut phase = ItemPhase::default();
        assert!(!phase.is_loading());
        phase.begin();
        assert!(phase.is_loading());
        phase.fail("nope");
        assert_eq!(phase.error(), Some("nope"));
        phase.finish();
        assert_eq!(phase, ItemPhase::Idle);
    }
}
