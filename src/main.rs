//! mproxy - Pre-warmed TCP Forwarder
//!
//! This is the main entry point for the mproxy application.

use anyhow::Result;
use clap::Parser;
use mproxy::config::{Config, TargetConfig};
use mproxy::proxy::run_proxy;
use std::net::{IpAddr, Ipv4Addr};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// mproxy - TCP forwarder with a pre-warmed outbound connection pool
#[derive(Parser, Debug)]
#[command(name = "mproxy")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
struct Args {
    /// Remote host
    #[arg(short = 'h', long, default_value = "")]
    host: String,

    /// Remote port
    #[arg(short = 'p', long, default_value_t = 0)]
    port: u16,

    /// Listen port (defaults to the remote port)
    #[arg(short = 'l', long = "listen", default_value_t = 0)]
    listen_port: u16,

    /// Local address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging format
    #[arg(long)]
    json_log: bool,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    setup_logging(&args.log_level, args.json_log)?;

    run(args).await
}

/// Validate the target and run the proxy until a fatal error
///
/// A missing host or port is logged and treated as a clean exit.
async fn run(args: Args) -> Result<()> {
    let target = TargetConfig::new(&args.host, args.port)
        .with_listen_port(args.listen_port)
        .with_bind_addr(args.bind);
    if let Err(e) = target.validate() {
        error!("{}", e);
        return Ok(());
    }

    info!("mproxy v{}", mproxy::VERSION);

    // Run the proxy
    run_proxy(Config::new(target)).await?;
    Ok(())
}

/// Setup logging based on configuration
fn setup_logging(level: &str, json: bool) -> Result<()> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .with_line_number(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
