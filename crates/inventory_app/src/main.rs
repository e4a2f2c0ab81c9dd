mod config;
mod platform;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use inventory_logging::{log_info, LogDestination};

use crate::config::AppConfig;

/// `inventory` command arguments. Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "inventory", version, about = "Gestion de stock en ligne de commande")]
struct CliArgs {
    /// Racine de l'API (ex: http://127.0.0.1:5000/)
    #[arg(long = "base-url", value_name = "URL")]
    base_url: Option<String>,

    /// Fichier de config RON (défaut: ./inventory.ron s'il existe)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Destination des logs
    #[arg(long, value_enum)]
    log: Option<LogArg>,

    /// Fichier de log
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Délai maximal d'une requête, en secondes
    #[arg(long = "timeout", value_name = "SECS")]
    request_timeout_secs: Option<u64>,

    /// Logs de niveau debug
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
    Off,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
            LogArg::Off => LogDestination::Off,
        }
    }
}

impl CliArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(log) = self.log {
            config.log = log.into();
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        config.verbose |= self.verbose;
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    inventory_logging::initialize(config.log, config.log_level(), &config.log_file);
    log_info!("inventory {} starting", env!("CARGO_PKG_VERSION"));

    platform::run_app(&config)
}
