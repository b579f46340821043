//! clean-charge entry point: CLI wiring and config-driven service construction.

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use clean_charge::config::AppConfig;
use clean_charge::service::{EnergyService, MAX_CHARGING_HOURS, MIN_CHARGING_HOURS};
use clean_charge::source::{CachedSource, CarbonIntensityClient, IntervalSource};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    hours: Option<u32>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: Option<u16>,
}

fn print_help() {
    eprintln!("clean-charge - cleanest EV charging window from the GB generation mix");
    eprintln!();
    eprintln!("Usage: clean-charge [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load settings from TOML config file");
    eprintln!("  --hours <1-6>            Also print the cleanest window of this length");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server instead of printing");
        eprintln!("  --port <u16>             API server port (overrides [server] port)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Log verbosity is read from RUST_LOG (default: clean_charge=info).");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        hours: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--hours" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --hours requires a number argument");
                    process::exit(1);
                }
                match args[i].parse::<u32>() {
                    Ok(h) if (MIN_CHARGING_HOURS..=MAX_CHARGING_HOURS).contains(&h) => cli.hours = Some(h),
                    _ => {
                        eprintln!(
                            "error: --hours value \"{}\" must be an integer between {MIN_CHARGING_HOURS} and {MAX_CHARGING_HOURS}",
                            args[i]
                        );
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = Some(p);
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Builds the live feed client, wrapped in the response cache when enabled.
fn build_source(cfg: &AppConfig) -> anyhow::Result<Arc<dyn IntervalSource>> {
    let client = CarbonIntensityClient::from_config(&cfg.upstream).context("failed to build HTTP client")?;
    if cfg.cache.enabled {
        info!(ttl_secs = cfg.cache.ttl_secs, "Upstream response cache enabled");
        Ok(Arc::new(CachedSource::new(client, Duration::from_secs(cfg.cache.ttl_secs))))
    } else {
        Ok(Arc::new(client))
    }
}

async fn print_report(service: &EnergyService, hours: Option<u32>) -> anyhow::Result<()> {
    let days = service
        .generation_mix()
        .await
        .context("failed to compute generation mix")?;
    for day in &days {
        println!("{day}");
    }

    if let Some(hours) = hours {
        let window = service
            .optimal_window(hours)
            .await
            .context("failed to find optimal charging window")?;
        println!("\nbest {hours}h window: {window}");
    }
    Ok(())
}

#[cfg(feature = "api")]
async fn run_server(service: EnergyService, cfg: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    use std::net::{IpAddr, SocketAddr};

    use clean_charge::api::{self, AppState};

    let ip: IpAddr = cfg
        .server
        .bind_address
        .parse()
        .with_context(|| format!("invalid bind address \"{}\"", cfg.server.bind_address))?;
    let addr = SocketAddr::new(ip, port.unwrap_or(cfg.server.port));
    let state = Arc::new(AppState { service });
    api::serve(state, addr, &cfg.server.allowed_origin)
        .await
        .with_context(|| format!("API server on {addr} failed"))
}

fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let cfg = match path {
        Some(path) => AppConfig::from_toml_file(Path::new(path))?,
        None => AppConfig::default(),
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("{} invalid config field(s)", errors.len());
    }
    Ok(cfg)
}

fn run(cli: CliArgs) -> anyhow::Result<()> {
    let cfg = load_config(cli.config_path.as_deref())?;
    let service = EnergyService::from_config(build_source(&cfg)?, &cfg);

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;

    #[cfg(feature = "api")]
    if cli.serve {
        return rt.block_on(run_server(service, &cfg, cli.port));
    }

    rt.block_on(print_report(&service, cli.hours))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clean_charge=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
