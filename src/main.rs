use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use fleetwatch::{logging, Settings, SettingsOverrides};

#[derive(Parser, Debug)]
#[command(name = "fleetwatch")]
#[command(about = "Collects device heartbeats and upload times and reports fleet statistics")]
struct Args {
    /// HTTP server port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Path to the devices CSV file (first column headed `device_id`)
    #[arg(short, long, env = "DEVICES_CSV")]
    devices: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Optional settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "fleetwatch=debug"
    #[arg(long)]
    log_filter: Option<String>,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            host: self.host.clone(),
            port: self.port,
            devices_csv: self.devices.clone(),
            log_filter: self.log_filter.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), args.overrides())?;
    logging::init(&settings.log_filter)?;

    match fleetwatch::run(settings, fleetwatch::shutdown_signal()).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %format!("{:#}", e), "fleetwatch exited with error");
            Ok(ExitCode::FAILURE)
        }
    }
}
