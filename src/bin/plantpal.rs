use std::error::Error;
use std::io::{BufRead, Write};

use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plantpal::api::ApiClient;
use plantpal::cli::{Cli, Command, ReminderCommand, TagCommand};
use plantpal::config::load_config;
use plantpal::models::NewUser;
use plantpal::session::Session;
use plantpal::version::VERSION;
use plantpal::views::account;
use plantpal::views::dashboard::DashboardView;
use plantpal::views::plant_form::PlantFormView;
use plantpal::views::reminders::RemindersView;
use plantpal::views::weather_alerts::WeatherAlertsView;
use plantpal::views::PlantPalBackend;

fn init_logging() {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily("logs", "plantpal.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    // Log to stderr so command output on stdout stays clean
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

/// Asks before a destructive action, unless `--yes` was given.
fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}

fn fail(message: impl Into<String>) -> Box<dyn Error> {
    message.into().into()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let cli = Cli::parse();
    init_logging();
    info!(version = VERSION, "Starting plantpal.");

    let config = load_config(&cli.config)?;
    let client = ApiClient::new(config.api_base_url.clone());
    let mut session = Session::load(config.session_path.clone())?;

    match cli.command {
        Command::Login { email } => {
            let profile = account::login(&client, &mut session, &email).await?;
            println!("Signed in as {} (user {}).", profile.name, profile.id);
        }
        Command::CreateAccount {
            name,
            email,
            zip,
            garden_name,
        } => {
            let profile = account::create_account(
                &client,
                &mut session,
                NewUser {
                    name,
                    email,
                    zip_code: zip,
                    garden_name,
                },
            )
            .await?;
            println!("Welcome, {}! Your account is ready.", profile.name);
        }
        Command::Logout => {
            session.clear()?;
            println!("Signed out.");
        }
        Command::Dashboard { search, tag } => {
            let user_id = session.user_id()?;
            let mut view = DashboardView::new(&client, user_id);
            view.load().await;
            view.refresh_session_names(&mut session).await;
            if let Some(error) = view.error() {
                return Err(fail(error));
            }
            if let Some(zip) = session.zip_code() {
                let zip = zip.to_string();
                view.load_weather(&zip).await;
            }

            let garden = session.garden_name().unwrap_or("Your Garden");
            println!("== {garden} ==");
            if let Some(weather) = view.weather_summary() {
                println!("{weather}");
            }

            if let Some(term) = search {
                view.set_search_term(term);
            }
            view.set_tag_filter(tag);
            for plant in view.filtered_plants() {
                let tags: Vec<&str> = plant.tags.iter().map(|t| t.name.as_str()).collect();
                println!(
                    "  #{:<4} {:<30} {}",
                    plant.id,
                    plant.display_name(),
                    tags.join(", ")
                );
            }

            let today = chrono::Local::now().date_naive();
            let thirsty = view.water_today(today);
            if !thirsty.is_empty() {
                println!("Water today:");
                for plant in thirsty {
                    println!("  #{:<4} {}", plant.id, plant.display_name());
                }
            }
        }
        Command::AddPlant {
            scientific_name,
            planted,
            outdoor,
            tags,
        } => {
            let user_id = session.user_id()?;
            let mut view = PlantFormView::new(&client, user_id);
            view.load_reference_data().await;
            view.apply_scientific_name(&scientific_name).await;
            view.form.planted_date = Some(planted);
            view.form.is_outdoor = outdoor;
            for tag in &tags {
                view.add_tag(tag).await?;
            }
            view.submit().await?;
            println!("Added {}.", view.form.scientific_name);
        }
        Command::EditPlant {
            id,
            scientific_name,
            planted,
            outdoor,
            tags,
            delete,
        } => {
            let user_id = session.user_id()?;
            let mut view = PlantFormView::new(&client, user_id);
            view.load_reference_data().await;
            view.load_for_edit(id)
                .await
                .map_err(|e| fail(format!("{e} Run the command again to retry.")))?;
            if delete {
                if !confirm(&format!("Remove plant #{id}?"), cli.yes) {
                    println!("Cancelled.");
                    return Ok(());
                }
                view.delete_plant().await?;
                println!("Removed plant #{id}.");
                return Ok(());
            }
            if let Some(name) = scientific_name {
                view.apply_scientific_name(&name).await;
            }
            if let Some(planted) = planted {
                view.form.planted_date = Some(planted);
            }
            if let Some(outdoor) = outdoor {
                view.form.is_outdoor = outdoor;
            }
            for tag in &tags {
                view.add_tag(tag).await?;
            }
            view.submit().await?;
            println!("Updated plant #{id}.");
        }
        Command::RemovePlant { id } => {
            let user_id = session.user_id()?;
            if !confirm(&format!("Remove plant #{id}?"), cli.yes) {
                println!("Cancelled.");
                return Ok(());
            }
            let mut view = DashboardView::new(&client, user_id);
            view.load().await;
            view.delete_plant(id).await;
            if let Some(error) = view.error() {
                return Err(fail(error));
            }
            println!("Removed plant #{id}.");
        }
        Command::Suggest { partial } => {
            let user_id = session.user_id()?;
            let mut view = PlantFormView::new(&client, user_id);
            view.set_suggestion_input(&partial);
            view.fetch_suggestions().await;
            for name in view.suggestions() {
                println!("{name}");
            }
        }
        Command::Settings {
            name,
            email,
            zip,
            garden_name,
            delete,
        } => {
            let user_id = session.user_id()?;
            if delete {
                if !confirm(
                    "Delete your account and all of its plants? This cannot be undone.",
                    cli.yes,
                ) {
                    println!("Cancelled.");
                    return Ok(());
                }
                account::delete_account(&client, &mut session, user_id).await?;
                println!("Account deleted.");
                return Ok(());
            }

            let mut view = account::SettingsView::new(&client, user_id);
            view.load().await;
            if let Some(name) = name {
                view.form.name = name;
            }
            if let Some(email) = email {
                view.form.email = email;
            }
            if let Some(zip) = zip {
                view.form.zip_code = zip;
            }
            if let Some(garden_name) = garden_name {
                view.form.garden_name = garden_name;
            }
            view.submit(&mut session).await;
            if let Some(error) = view.error() {
                return Err(fail(error));
            }
            println!("{}", view.success().unwrap_or("Account updated."));
        }
        Command::Tags { command } => match command {
            TagCommand::List => {
                for tag in client.get_all_tags().await? {
                    println!("#{:<4} {}", tag.id, tag.name);
                }
            }
            TagCommand::Create { name } => {
                let tag = client.create_tag(&name).await?;
                println!("Created tag #{} \"{}\".", tag.id, tag.name);
            }
            TagCommand::Delete { id } => {
                if !confirm(
                    &format!("Delete tag #{id}? It will be removed from every plant."),
                    cli.yes,
                ) {
                    println!("Cancelled.");
                    return Ok(());
                }
                client.delete_tag(id).await?;
                println!("Deleted tag #{id}.");
            }
        },
        Command::Reminders { command } => {
            let user_id = session.user_id()?;
            let mut view = RemindersView::new(&client, user_id);
            view.load().await;
            if let Some(error) = view.page_error() {
                return Err(fail(error));
            }

            match command {
                ReminderCommand::List => {}
                ReminderCommand::On => {
                    if !view.reminders_active() {
                        view.toggle_reminders().await;
                    }
                }
                ReminderCommand::Off => {
                    if view.reminders_active() {
                        view.toggle_reminders().await;
                    }
                }
                ReminderCommand::Set { plant, days } => {
                    view.set_frequency(plant, days).await;
                }
                ReminderCommand::Create { plant, days } => {
                    view.create_reminder(Some(plant), Some(days)).await;
                }
                ReminderCommand::Remove { plant } => {
                    if !confirm(&format!("Remove the reminder for plant #{plant}?"), cli.yes) {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    view.remove_reminder(plant).await;
                    if let Some(entry) = view.entries().get(&plant) {
                        if let Some(error) = entry.phase.error() {
                            return Err(fail(error));
                        }
                    }
                }
            }
            if let Some(error) = view.page_error() {
                return Err(fail(error));
            }

            println!(
                "Reminder notifications: {}",
                if view.reminders_active() { "on" } else { "off" }
            );
            let mut plants: Vec<_> = view.plants().to_vec();
            plants.sort_by_key(|p| p.id);
            for plant in &plants {
                match view.entries().get(&plant.id) {
                    Some(entry) => {
                        let last = entry
                            .last_watered
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_else(|| "never".to_string());
                        println!(
                            "  #{:<4} {:<30} every {} day(s), last watered {last}",
                            plant.id,
                            plant.display_name(),
                            entry.frequency_days
                        );
                    }
                    None => println!(
                        "  #{:<4} {:<30} no reminder",
                        plant.id,
                        plant.display_name()
                    ),
                }
            }
        }
        Command::WeatherAlerts { toggle } => {
            let user_id = session.user_id()?;
            let mut view = WeatherAlertsView::new(&client, user_id, session.subscribe_zip());
            view.load().await;
            if toggle {
                view.toggle_alerts().await;
            }
            if let Some(error) = view.error() {
                return Err(fail(error));
            }
            println!(
                "Weather alerts: {}",
                if view.alerts_active() { "on" } else { "off" }
            );
            if let Some(weather) = view.weather_summary() {
                println!("{weather}");
            }
        }
    }

    Ok(())
}
