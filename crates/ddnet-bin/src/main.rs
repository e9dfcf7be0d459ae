// ddnet-fifo — headless host that executes console commands from the input FIFO.

mod host;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ddnet_config::{ClientConfig, ConfigOverrides};
use log::{info, warn};

use host::Host;

#[derive(Parser, Debug)]
#[command(name = "ddnet-fifo", about = "Execute console commands written to a FIFO")]
struct Args {
    /// Path to the settings JSON file.
    #[arg(long, default_value = ddnet_config::CONFIG_FILE)]
    config: PathBuf,

    /// FIFO path (pipe name on Windows). Overrides cl_input_fifo.
    #[arg(long, env = "DDNET_INPUT_FIFO")]
    fifo: Option<String>,

    /// Main loop ticks per second.
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,

    /// Stop after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write the effective settings back to the config file and exit.
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = ClientConfig::load_from(&args.config);
    let mut config = match &loaded {
        Ok(c) => c.clone(),
        Err(_) => ClientConfig::default(),
    };
    config.apply_overrides(&ConfigOverrides {
        cl_input_fifo: args.fifo.clone(),
        tick_rate: args.tick_rate,
        log_level: args.log_level.clone(),
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if args.save_config {
        // Never overwrite a file that failed to parse.
        loaded?;
        config.save_to(&args.config)?;
        info!("saved settings to {}", args.config.display());
        return Ok(());
    }

    if let Err(e) = loaded {
        warn!("{e:#}, continuing with defaults");
    }

    if config.cl_input_fifo.is_empty() {
        warn!("cl_input_fifo is empty, no commands will be read");
    }

    let mut host = Host::new(&config)?;
    if !config.cl_input_fifo.is_empty() && !host.fifo().is_active() {
        warn!("input fifo unavailable, running without it");
    }
    host.run(args.max_ticks);
    host.shutdown();
    info!(
        "{} commands executed, {} rejected",
        host.console().executed_count(),
        host.console().rejected_count()
    );
    Ok(())
}
