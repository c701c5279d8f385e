//! DroneDesk CLI
//!
//! Operator console for the drone fleet:
//! - Browse drones and medications
//! - Register drones, load medications, advance deliveries
//! - Read and export the event log

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use dronedesk::telemetry::{init_logging, LogTarget};
use dronedesk::{
    build_dashboard, Config, DroneCard, DroneView, Event, ListView, Medication, MedicationForm,
    Notification, StoreBackend,
};

#[derive(Parser)]
#[command(name = "dronedesk-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator console for a drone medication-delivery fleet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Fleet service base URL
    #[arg(long, global = true)]
    pub fleet_url: Option<String>,

    /// Event log directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Event store backend
    #[arg(long, global = true)]
    pub backend: Option<StoreBackend>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the home page: loaded, ready, out for delivery, returning
    Home,

    /// List drones
    Drones {
        /// all, loaded, for-delivery, delivered, returning or idle
        #[arg(short, long, default_value = "all")]
        view: DroneView,
    },

    /// Show one drone with its battery and medications
    Drone {
        serial_number: String,
    },

    /// List saved medications
    Medications,

    /// Show one medication
    Medication {
        id: String,
    },

    /// Register a new drone
    Register {
        /// light, middle, cruiser or heavy
        weight_class: dronedesk::WeightClass,
        /// Exit without showing the idle drones afterwards
        #[arg(long)]
        no_follow_up: bool,
    },

    /// Load a medication onto a drone: a saved one by id, or a new one
    /// described by --name, --weight and --code
    Load {
        serial_number: String,
        /// Id of a saved medication
        #[arg(conflicts_with_all = ["name", "weight", "code", "img_url"])]
        medication_id: Option<String>,
        /// Letters, digits, '-' and '_'
        #[arg(long, required_unless_present = "medication_id")]
        name: Option<String>,
        /// Grams
        #[arg(long, required_unless_present = "medication_id")]
        weight: Option<f64>,
        /// Letters, digits and '_' (uppercased)
        #[arg(long, required_unless_present = "medication_id")]
        code: Option<String>,
        #[arg(long)]
        img_url: Option<String>,
    },

    /// Advance a drone to its next delivery state
    Advance {
        serial_number: String,
    },

    /// Show the event log
    Events,

    /// Append a message to the event log
    Log {
        message: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let config = load_config(&cli)?;
    init_logging(&config.logging, LogTarget::Stderr);

    let dashboard = Arc::new(build_dashboard(&config)?);
    let format = cli.format;

    match cli.command {
        Commands::Home => {
            let home = dashboard.home().await;
            if format == OutputFormat::Json {
                return print_json(&home);
            }
            println!("{}", home.title);
            for section in &home.sections {
                println!();
                print_drones(section);
            }
        }

        Commands::Drones { view } => {
            let list = dashboard.drones(view).await;
            match format {
                OutputFormat::Json => print_json(&list)?,
                _ => print_drones(&list),
            }
        }

        Commands::Drone { serial_number } => {
            let Some(detail) = dashboard.drone_detail(&serial_number).await? else {
                bail!("Drone {} not found", serial_number);
            };
            if format == OutputFormat::Json {
                return print_json(&detail);
            }

            let drone = &detail.card.drone;
            println!("Drone {}", drone.serial_number);
            println!(
                "  Class:   {}",
                drone
                    .weight_class
                    .map(|c| c.label())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!("  State:   {}", drone.state);
            println!("  Battery: {}%", detail.battery_level);
            if let Some(action) = detail.card.action {
                println!("  Action:  {}", action);
            }
            println!();
            print_medications(&ListView::loaded(
                "Loaded medications",
                "No medications loaded",
                detail.medications,
            ));
        }

        Commands::Medications => {
            let list = dashboard.medications().await;
            match format {
                OutputFormat::Json => print_json(&list)?,
                _ => print_medications(&list),
            }
        }

        Commands::Medication { id } => {
            let Some(medication) = dashboard.medication(&id).await? else {
                bail!("Medication {} not found", id);
            };
            match format {
                OutputFormat::Json => print_json(&medication)?,
                _ => print_medications(&ListView::loaded("Medication", "", vec![medication])),
            }
        }

        Commands::Register {
            weight_class,
            no_follow_up,
        } => {
            let outcome = dashboard.register(weight_class).await;
            print_notification(&outcome.notification);

            if !outcome.notification.is_success() {
                std::process::exit(1);
            }

            if !no_follow_up {
                println!();
                println!(
                    "Showing idle drones in {}s...",
                    dashboard.follow_up_delay().as_secs()
                );
                let follow_up = dashboard.follow_up_idle();
                tokio::select! {
                    idle = follow_up.wait() => {
                        if let Some(idle) = idle {
                            println!();
                            print_drones(&idle);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
        }

        Commands::Load {
            serial_number,
            medication_id,
            name,
            weight,
            code,
            img_url,
        } => {
            let medication = match medication_id {
                Some(id) => match dashboard.medication(&id).await? {
                    Some(medication) => medication,
                    None => bail!("Medication {} not found", id),
                },
                None => MedicationForm {
                    name: name.unwrap_or_default(),
                    weight: weight.unwrap_or_default(),
                    code: code.unwrap_or_default(),
                    img_url,
                }
                .into_medication()?,
            };
            let notification = dashboard.load_medication(&serial_number, &medication).await;
            finish(&notification);
        }

        Commands::Advance { serial_number } => {
            let Some(drone) = dashboard.drone(&serial_number).await? else {
                bail!("Drone {} not found", serial_number);
            };
            match dashboard.advance(&serial_number, &drone.state).await {
                Some(notification) => finish(&notification),
                None => bail!(
                    "No action for drone {} in state {}",
                    serial_number,
                    drone.state
                ),
            }
        }

        Commands::Events => {
            let page = dashboard.events().await;
            match format {
                OutputFormat::Json => print_json(&page.events)?,
                OutputFormat::Csv => write_events_csv(&page.events, std::io::stdout())?,
                OutputFormat::Table => {
                    println!("{}", page.title);
                    println!("{}", "-".repeat(60));
                    if page.events.is_empty() {
                        println!("{}", page.empty_message);
                    }
                    for event in &page.events {
                        println!("{:<24} {}", event.display_time(), event.message);
                    }
                }
            }
        }

        Commands::Log { message } => {
            let event = dashboard
                .event_log()
                .try_append(message)
                .await
                .context("Failed to record event")?;
            println!("Logged {} at {}", event.id, event.display_time());
        }

        // Written before any store or client is opened
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(url) = &cli.fleet_url {
        config.fleet.url = url.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.events.data_dir = dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.events.backend = backend;
    }

    Ok(config)
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let config = dronedesk::config::generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_notification(notification: &Notification) {
    println!("{}", notification.title);
    println!("  {}", notification.description);
}

/// Print the notification and exit non-zero if it reports a failure
fn finish(notification: &Notification) {
    print_notification(notification);
    if !notification.is_success() {
        std::process::exit(1);
    }
}

fn print_drones(list: &ListView<DroneCard>) {
    println!("{}", list.title);
    if list.is_empty() {
        println!("  {}", list.empty_message);
        return;
    }

    println!(
        "  {:<16} {:<16} {:<12} {:>7}  {}",
        "Serial", "Class", "State", "Battery", "Action"
    );
    println!("  {}", "-".repeat(72));
    for card in &list.items {
        let drone = &card.drone;
        println!(
            "  {:<16} {:<16} {:<12} {:>7}  {}",
            drone.serial_number,
            drone.weight_class.map(|c| c.as_str()).unwrap_or("-"),
            drone.state.as_str(),
            drone
                .battery_capacity
                .map(|b| format!("{}%", b))
                .unwrap_or_else(|| "-".to_string()),
            card.action.unwrap_or("")
        );
    }
}

fn print_medications(list: &ListView<Medication>) {
    for line in medication_lines(list) {
        println!("{}", line);
    }
}

fn medication_lines(list: &ListView<Medication>) -> Vec<String> {
    let mut lines = vec![list.title.clone()];
    if list.is_empty() {
        lines.push(format!("  {}", list.empty_message));
        return lines;
    }

    lines.push(format!(
        "  {:<12} {:<24} {:<12} {:>8}",
        "ID", "Name", "Code", "Weight"
    ));
    lines.push(format!("  {}", "-".repeat(60)));
    for med in &list.items {
        lines.push(format!(
            "  {:<12} {:<24} {:<12} {:>7}g",
            med.id.as_deref().unwrap_or("-"),
            med.name,
            med.code,
            med.weight
        ));
    }
    lines
}

fn write_events_csv<W: Write>(events: &[Event], out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["id", "message", "timeStamp"])?;
    for event in events {
        writer.write_record([
            event.id.as_str(),
            event.message.as_str(),
            &event.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
