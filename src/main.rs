use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use linky_tic::status_register::decode_all;
use linky_tic::tic::checksum;
use linky_tic::{
    decode_address, init_logger, log_info, probe, start_reader, SerialConfig, TicConfig, TicMode,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "linky-tic")]
#[command(about = "CLI tool for the Linky TIC protocol")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Opens a serial device and reads one line
    Probe {
        port: String,
        #[arg(short, long, default_value = "historic")]
        mode: TicMode,
    },
    /// Decodes a meter and prints its values periodically
    Monitor {
        port: Option<String>,
        #[arg(short, long)]
        mode: Option<TicMode>,
        #[arg(long)]
        three_phase: bool,
        #[arg(long)]
        producer: bool,
        #[arg(long)]
        realtime: bool,
        /// JSON configuration file, overridden by the other options
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Seconds between two snapshots
        #[arg(short, long, default_value = "10")]
        interval: u64,
    },
    /// Decodes a 12 character meter address
    DecodeAddress { address: String },
    /// Decodes every field of a status register
    Status { register: String },
    /// Computes the checksum character of a group
    Checksum {
        tag: String,
        value: String,
        #[arg(short, long)]
        timestamp: Option<String>,
        #[arg(short, long, default_value = "standard")]
        mode: TicMode,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe { port, mode } => {
            probe(&SerialConfig::new(&port, mode))
                .await
                .with_context(|| format!("probing {port}"))?;
            log_info(&format!("{port} is usable in {mode} mode"));
        }
        Commands::Monitor {
            port,
            mode,
            three_phase,
            producer,
            realtime,
            config,
            interval,
        } => {
            let mut tic_config = match config {
                Some(path) => TicConfig::from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => TicConfig::default(),
            };
            if let Some(port) = port {
                tic_config.port = port;
            }
            if let Some(mode) = mode {
                tic_config.mode = mode;
            }
            tic_config.three_phase |= three_phase;
            tic_config.producer |= producer;
            tic_config.realtime |= realtime;
            tic_config.validate()?;
            monitor(&tic_config, Duration::from_secs(interval.max(1))).await?;
        }
        Commands::DecodeAddress { address } => {
            let identity = decode_address(&address)?;
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
        Commands::Status { register } => {
            for (field, value) in decode_all(&register)? {
                match value {
                    Ok(value) => println!("{field}: {value}"),
                    Err(e) => println!("{field}: {e}"),
                }
            }
        }
        Commands::Checksum {
            tag,
            value,
            timestamp,
            mode,
        } => {
            if timestamp.is_some() && mode == TicMode::Historic {
                bail!("historic mode groups carry no timestamp");
            }
            let frame = checksum::checksummed_bytes(
                mode,
                tag.as_bytes(),
                timestamp.as_deref().map(str::as_bytes),
                value.as_bytes(),
            );
            println!("{}", char::from(checksum::compute(&frame)));
        }
    }

    Ok(())
}

async fn monitor(config: &TicConfig, interval: Duration) -> Result<()> {
    let reader = start_reader(config);
    let decoder = reader.decoder();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                println!("{}", serde_json::to_string_pretty(&decoder.snapshot())?);
            }
            res = tokio::signal::ctrl_c() => {
                res.context("waiting for Ctrl-C")?;
                break;
            }
        }
    }

    reader.stop();
    reader.join().await.context("joining the reader worker")?;
    log_info("Monitor stopped");
    Ok(())
}
