use chrono::NaiveDate;
use std::time::Duration;
use tracing::warn;

use super::PlantPalBackend;
use crate::api::ApiError;
use crate::models::{PlantInfo, Tag, UserPlant, UserPlantInput};

/// Delay before the newest recorded partial name is sent to the suggestion
/// endpoint.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Form state shared by the add- and edit-plant pages.
#[derive(Debug, Clone, Default)]
pub struct PlantForm {
    pub plant_id: Option<i32>,
    pub scientific_name: String,
    pub common_name: String,
    pub species: String,
    pub preferred_soil_conditions: String,
    pub propagation_methods: String,
    pub edible_parts: String,
    pub is_pet_safe: bool,
    pub image_url: String,
    pub planted_date: Option<NaiveDate>,
    pub is_outdoor: bool,
    pub tag_ids: Vec<i32>,
}

impl PlantForm {
    pub fn from_user_plant(plant: &UserPlant) -> Self {
        Self {
            plant_id: Some(plant.plant_id),
            scientific_name: plant.plant.scientific_name.clone(),
            common_name: plant.plant.common_name.clone(),
            species: plant.plant.species.clone(),
            preferred_soil_conditions: plant.plant.preferred_soil_conditions.clone(),
            propagation_methods: plant.plant.propagation_methods.clone(),
            edible_parts: plant.plant.edible_parts.clone(),
            is_pet_safe: plant.plant.is_pet_safe,
            image_url: plant.plant.image_url.clone(),
            planted_date: Some(plant.planted_date),
            is_outdoor: plant.is_outdoor,
            tag_ids: plant.tags.iter().map(|t| t.id).collect(),
        }
    }

    fn apply_catalog_entry(&mut self, entry: &PlantInfo) {
        self.plant_id = Some(entry.id);
        self.scientific_name = entry.scientific_name.clone();
        self.common_name = entry.common_name.clone();
        self.species = entry.species.clone();
        self.preferred_soil_conditions = entry.preferred_soil_conditions.clone();
        self.propagation_methods = entry.propagation_methods.clone();
        self.edible_parts = entry.edible_parts.clone();
        self.is_pet_safe = entry.is_pet_safe;
        self.image_url = entry.image_url.clone();
    }
}

/// The add/edit-plant view: catalog-or-AI autofill, debounced name
/// suggestions, and tag management.
pub struct PlantFormView<'a> {
    backend: &'a dyn PlantPalBackend,
    user_id: i32,
    pub form: PlantForm,
    catalog: Vec<PlantInfo>,
    tags: Vec<Tag>,
    editing: Option<i32>,
    pending_partial: Option<String>,
    suggestions: Vec<String>,
    suggestions_loading: bool,
    error: Option<String>,
}

impl<'a> PlantFormView<'a> {
    pub fn new(backend: &'a dyn PlantPalBackend, user_id: i32) -> Self {
        Self {
            backend,
            user_id,
            form: PlantForm::default(),
            catalog: Vec::new(),
            tags: Vec::new(),
            editing: None,
            pending_partial: None,
            suggestions: Vec::new(),
            suggestions_loading: false,
            error: None,
        }
    }

    /// Loads the plant catalog and tag list used for matching and the tag
    /// selector. Each failure is surfaced but does not block the form.
    pub async fn load_reference_data(&mut self) {
        match self.backend.get_catalog_plants().await {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => {
                warn!(error = %e, "Failed to load plants.");
                self.error = Some("Failed to load plants.".to_string());
            }
        }
        match self.backend.get_all_tags().await {
            Ok(tags) => self.tags = tags,
            Err(e) => {
                warn!(error = %e, "Failed to load tags.");
                self.error = Some("Failed to load tags.".to_string());
            }
        }
    }

    /// Loads an existing user plant into the form. The caller offers a manual
    /// retry on failure; there are no automatic retries.
    pub async fn load_for_edit(&mut self, user_plant_id: i32) -> Result<(), ApiError> {
        match self.backend.get_user_plant_by_id(user_plant_id).await {
            Ok(plant) => {
                self.form = PlantForm::from_user_plant(&plant);
                self.editing = Some(user_plant_id);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(user_plant_id, error = %e, "Failed to load plant.");
                self.error = Some("Failed to load plant. Try again.".to_string());
                Err(e)
            }
        }
    }

    /// Records a keystroke's partial scientific name. Each call replaces the
    /// previous pending input; an empty input clears the suggestion list.
    pub fn set_suggestion_input(&mut self, partial: &str) {
        let partial = partial.trim();
        if partial.is_empty() {
            self.pending_partial = None;
            self.suggestions.clear();
        } else {
            self.pending_partial = Some(partial.to_string());
        }
    }

    /// Waits out the debounce window, then fetches completions for the newest
    /// recorded input. A burst of inputs yields one request; with nothing
    /// pending this is a no-op.
    pub async fn fetch_suggestions(&mut self) {
        if self.pending_partial.is_none() {
            return;
        }
        tokio::time::sleep(SUGGESTION_DEBOUNCE).await;
        let Some(partial) = self.pending_partial.take() else {
            return;
        };

        self.suggestions_loading = true;
        match self.backend.fetch_name_suggestions(&partial).await {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(e) => {
                warn!(error = %e, "Error fetching suggestions.");
                self.suggestions.clear();
            }
        }
        self.suggestions_loading = false;
    }

    /// Applies a chosen scientific name: an existing catalog entry wins
    /// (matched case-insensitively), otherwise the AI lookup fills the
    /// remaining fields. An AI failure keeps the name and touches nothing else.
    pub async fn apply_scientific_name(&mut self, scientific_name: &str) {
        self.pending_partial = None;
        self.suggestions.clear();

        if let Some(entry) = self
            .catalog
            .iter()
            .find(|p| p.scientific_name.eq_ignore_ascii_case(scientific_name))
        {
            let entry = entry.clone();
            self.form.apply_catalog_entry(&entry);
            return;
        }

        self.form.plant_id = None;
        self.form.scientific_name = scientific_name.to_string();
        match self.backend.fetch_plant_info(scientific_name).await {
            Ok(info) => {
                self.form.common_name = info.common_name;
                self.form.species = info.species;
                self.form.preferred_soil_conditions = info.preferred_soil_conditions;
                self.form.propagation_methods = info.propagation_methods;
                self.form.edible_parts = info.edible_parts;
                self.form.is_pet_safe = info.is_pet_safe;
                self.form.image_url = info.image_url;
            }
            Err(e) => {
                warn!(scientific_name, error = %e, "AI lookup failed.");
            }
        }
    }

    /// Adds a tag to the form, creating it on the backend if no tag with that
    /// name exists yet (the combo-input behavior).
    pub async fn add_tag(&mut self, name: &str) -> Result<(), ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Tag name cannot be empty.".to_string()));
        }

        let existing = self
            .tags
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .cloned();
        let tag = match existing {
            Some(tag) => tag,
            None => {
                let tag = self.backend.create_tag(name).await?;
                self.tags.push(tag.clone());
                tag
            }
        };
        if !self.form.tag_ids.contains(&tag.id) {
            self.form.tag_ids.push(tag.id);
        }
        Ok(())
    }

    /// Deletes a tag globally and cascades it out of the local caches. The
    /// destructive-action confirmation happens at the call site.
    pub async fn delete_tag(&mut self, tag_id: i32) -> Result<(), ApiError> {
        self.backend.delete_tag(tag_id).await?;
        self.tags.retain(|t| t.id != tag_id);
        self.form.tag_ids.retain(|id| *id != tag_id);
        Ok(())
    }

    /// Deletes the plant being edited. Confirmation happens at the call site.
    pub async fn delete_plant(&mut self) -> Result<(), ApiError> {
        let Some(id) = self.editing else {
            return Err(ApiError::Validation(
                "No plant loaded for editing.".to_string(),
            ));
        };
        self.backend.delete_user_plant(id).await?;
        self.editing = None;
        self.form = PlantForm::default();
        Ok(())
    }

    /// Submits the form: POST for a new plant, full PUT when editing.
    pub async fn submit(&mut self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        if self.form.scientific_name.trim().is_empty() {
            problems.push("Enter a scientific name.");
        }
        if self.form.planted_date.is_none() {
            problems.push("Enter a planted date.");
        }
        if !problems.is_empty() {
            let message = problems.join(" ");
            self.error = Some(message.clone());
            return Err(ApiError::Validation(message));
        }
        let planted_date = match self.form.planted_date {
            Some(date) => date,
            None => return Err(ApiError::Validation("Enter a planted date.".to_string())),
        };

        let input = UserPlantInput {
            user_id: self.user_id,
            plant_id: self.form.plant_id,
            scientific_name: self.form.scientific_name.trim().to_string(),
            common_name: self.form.common_name.clone(),
            species: self.form.species.clone(),
            preferred_soil_conditions: self.form.preferred_soil_conditions.clone(),
            propagation_methods: self.form.propagation_methods.clone(),
            edible_parts: self.form.edible_parts.clone(),
            is_pet_safe: self.form.is_pet_safe,
            image_url: self.form.image_url.clone(),
            is_outdoor: self.form.is_outdoor,
            planted_date,
            tag_ids: self.form.tag_ids.clone(),
        };

        let result = match self.editing {
            Some(id) => self.backend.update_user_plant(id, &input).await,
            None => self.backend.create_user_plant(&input).await.map(|_| ()),
        };
        match result {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestions_loading(&self) -> bool {
        self.suggestions_loading
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn catalog(&self) -> &[PlantInfo] {
        &self.catalog
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
