//! tflens - a terminal viewer for infrastructure-provisioning run logs
//!
//! This is the binary entry point. All logic lives in the workspace crates.

mod headless;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{bail, WrapErr};

use tflens_app::config::{self, SettingsOverrides};
use tflens_app::{AppState, FileKvStore, SelectionStore};
use tflens_backend::HttpBackend;
use tflens_core::{PairingMode, RunId};

/// tflens - browse, group and export provisioning run logs
#[derive(Parser, Debug)]
#[command(name = "tflens")]
#[command(about = "A terminal viewer for infrastructure-provisioning run logs", long_about = None)]
struct Args {
    /// Backend API base URL
    #[arg(long, value_name = "URL")]
    backend: Option<String>,

    /// Run to open on startup
    #[arg(long, value_name = "ID")]
    run: Option<RunId>,

    /// Pairing mode: tf_req_id, resource or phase
    #[arg(long, value_name = "MODE")]
    pair_by: Option<String>,

    /// Entries per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Config file (default: <config dir>/tflens/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Print the view tree and timeline as NDJSON instead of starting the TUI
    #[arg(long)]
    headless: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    if args.init_config {
        config::init_config(&config_path)?;
        eprintln!("Config written to {}", config_path.display());
        return Ok(());
    }

    if args.headless {
        tflens_core::logging::init_stderr();
    } else {
        tflens_core::logging::init(&tflens_core::logging::log_directory())?;
    }

    let mut settings = config::load_settings(&config_path);
    SettingsOverrides {
        base_url: args.backend.clone(),
        pairing: args.pair_by.as_deref().map(PairingMode::from_wire),
        page_size: args.page_size,
    }
    .apply(&mut settings);

    let backend = Arc::new(
        HttpBackend::new(
            &settings.backend.base_url,
            Duration::from_secs(settings.backend.timeout_secs),
        )
        .wrap_err("Invalid backend URL")?,
    );
    tracing::info!("Using backend {}", backend.endpoints().base());

    if args.headless {
        let Some(run_id) = args.run else {
            bail!("--headless requires --run <ID>");
        };
        let state = AppState::with_store(settings, SelectionStore::in_memory());
        headless::run_headless(state, backend, run_id).await?;
        return Ok(());
    }

    let store = SelectionStore::new(FileKvStore::open(settings.state.resolved_path()));
    let state = AppState::with_store(settings, store);
    tflens_tui::run(state, backend, args.run).await?;
    Ok(())
}
