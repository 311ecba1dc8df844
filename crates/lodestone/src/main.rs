mod provider; // Declare the provider module

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::error;

use lodestone_core::{ModManager, ModSettings};
use lodestone_core::resource::LoadState;

use crate::provider::DiskProvider;

/// Lodestone: runtime mod management for a host application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Directory to scan for mod packages
    #[arg(long, default_value = "./mods")]
    root: PathBuf,

    /// Host version the mods are checked against
    #[arg(long, default_value = "1.0.0")]
    host_version: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List discovered mods with their validity and resolution status
    List {},
    /// Explain whether a mod can load right now
    Check {
        /// The id of the mod to check
        id: String,
    },
    /// Load a mod asynchronously, showing progress
    Load {
        /// The id of the mod to load
        id: String,
    },
    /// Enable a mod (persisted to its descriptor)
    Enable {
        /// The id of the mod to enable
        id: String,
    },
    /// Disable a mod (persisted to its descriptor)
    Disable {
        /// The id of the mod to disable
        id: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    let host_version = match semver::Version::parse(&args.host_version) {
        Ok(version) => version,
        Err(e) => {
            error!("invalid --host-version '{}': {}", args.host_version, e);
            std::process::exit(1);
        }
    };

    let settings = ModSettings::new(host_version, Arc::new(DiskProvider));
    let mut manager = ModManager::new(settings);
    match manager.scan(&args.root).await {
        Ok(count) => println!("Discovered {} mod(s) under {}", count, args.root.display()),
        Err(e) => {
            error!("scan failed: {}", e);
            std::process::exit(1);
        }
    }

    match args.command {
        Commands::List {} => list_mods(&mut manager),
        Commands::Check { id } => check_mod(&mut manager, &id),
        Commands::Load { id } => load_mod(&mut manager, &id),
        Commands::Enable { id } => set_enabled(&mut manager, &id, true).await,
        Commands::Disable { id } => set_enabled(&mut manager, &id, false).await,
    }
}

fn list_mods(manager: &mut ModManager) {
    for id in manager.unit_ids() {
        let can_load = manager.can_load(&id);
        let Some(unit) = manager.unit(&id) else {
            continue;
        };
        let descriptor = unit.descriptor();
        let status = if !unit.is_valid() {
            "invalid"
        } else if !descriptor.enabled {
            "disabled"
        } else if can_load {
            "ready"
        } else {
            "blocked"
        };
        println!(
            "{:<20} {:<10} v{:<10} [{}]",
            descriptor.id, descriptor.name, descriptor.version, status
        );
        let report = unit.dependency_report();
        for missing in &report.missing {
            println!("    missing dependency: {}", missing);
        }
        for disabled in &report.found_disabled {
            println!("    disabled dependency: {}", disabled);
        }
        for conflict in unit.conflicting_units() {
            println!("    conflicts with: {}", conflict);
        }
    }
}

fn check_mod(manager: &mut ModManager, id: &str) {
    let can_load = manager.can_load(id);
    let Some(unit) = manager.unit(id) else {
        println!("unknown mod: {}", id);
        std::process::exit(1);
    };
    println!("{}: can_load = {}", id, can_load);
    if let Some(reason) = unit.invalid_reason() {
        println!("    invalid: {}", reason);
    }
    for missing in &unit.dependency_report().missing {
        println!("    missing dependency: {}", missing);
    }
    for conflict in unit.conflicting_units() {
        println!("    conflicts with: {}", conflict);
    }
}

fn load_mod(manager: &mut ModManager, id: &str) {
    if manager.unit(id).is_none() {
        println!("unknown mod: {}", id);
        std::process::exit(1);
    }
    manager.start_load(id);

    // Drive the cooperative loader the way a host frame loop would.
    let mut ticks = 0u32;
    while manager.unit(id).map(|u| u.is_busy()).unwrap_or(false) && ticks < 1000 {
        manager.tick();
        ticks += 1;
        if let Some(unit) = manager.unit(id) {
            println!("progress: {:>5.1}%", unit.load_progress() * 100.0);
        }
    }

    match manager.unit(id).map(|u| u.load_state()) {
        Some(LoadState::Loaded) => println!("{} loaded", id),
        Some(state) => {
            println!("{} did not load (state: {})", id, state);
            std::process::exit(1);
        }
        None => {
            println!("unknown mod: {}", id);
            std::process::exit(1);
        }
    }
}

async fn set_enabled(manager: &mut ModManager, id: &str, enabled: bool) {
    match manager.set_enabled(id, enabled).await {
        Ok(()) => println!(
            "{} {}",
            id,
            if enabled { "enabled" } else { "disabled" }
        ),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
