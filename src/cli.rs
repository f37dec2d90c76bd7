use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Command-line interface for the PlantPal client.
#[derive(Parser, Debug)]
#[command(name = "plantpal", version = crate::version::VERSION, about = "Track your houseplants from the terminal")]
pub struct Cli {
    /// Path to the client configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Skip confirmation prompts for destructive actions.
    #[arg(long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with an email address.
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create a new account and sign in.
    CreateAccount {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        zip: String,
        #[arg(long, default_value = "Your Garden")]
        garden_name: String,
    },
    /// Sign out locally.
    Logout,
    /// Show your plants, optionally filtered.
    Dashboard {
        /// Filter by common or scientific name.
        #[arg(long)]
        search: Option<String>,
        /// Show only plants carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },
    /// Add a plant to your garden.
    AddPlant {
        #[arg(long)]
        scientific_name: String,
        /// Planted date as YYYY-MM-DD.
        #[arg(long)]
        planted: NaiveDate,
        #[arg(long)]
        outdoor: bool,
        /// Tags to attach, created on the fly when missing.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Edit an existing plant.
    EditPlant {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        scientific_name: Option<String>,
        #[arg(long)]
        planted: Option<NaiveDate>,
        #[arg(long)]
        outdoor: Option<bool>,
        /// Tags to add on top of the existing ones.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Delete the plant instead of updating it.
        #[arg(long)]
        delete: bool,
    },
    /// Remove a plant from your garden.
    RemovePlant {
        #[arg(long)]
        id: i32,
    },
    /// Suggest scientific names for a partial input.
    Suggest {
        partial: String,
    },
    /// Show or change account settings.
    Settings {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        #[arg(long)]
        garden_name: Option<String>,
        /// Delete the account instead of updating it.
        #[arg(long)]
        delete: bool,
    },
    /// Manage tags.
    Tags {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Manage watering reminders.
    Reminders {
        #[command(subcommand)]
        command: ReminderCommand,
    },
    /// Show weather alerts and the current conditions.
    WeatherAlerts {
        /// Flip the master switch before showing the state.
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// List all tags.
    List,
    /// Create a tag.
    Create { name: String },
    /// Delete a tag everywhere it is used.
    Delete { id: i32 },
}

#[derive(Subcommand, Debug)]
pub enum ReminderCommand {
    /// List reminders and the plants without one.
    List,
    /// Turn reminder notifications on.
    On,
    /// Turn reminder notifications off.
    Off,
    /// Change the watering frequency of a plant's reminder.
    Set {
        #[arg(long)]
        plant: i32,
        #[arg(long)]
        days: i32,
    },
    /// Create a reminder for a plant.
    Create {
        #[arg(long)]
        plant: i32,
        #[arg(long)]
        days: i32,
    },
    /// Remove a plant's reminder.
    Remove {
        #[arg(long)]
        plant: i32,
    },
}
