use clap::Parser;
use sieve_dns_domain::{CliOverrides, ForwarderMode};
use sieve_dns_jobs::{CacheMaintenanceJob, JobRunner, ListReloadJob, MetricsReportJob};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "sieve-dns")]
#[command(version)]
#[command(about = "Sieve DNS - forwarding DNS resolver with per-client block and allow lists")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Upstream transport (udp, https, tls)
    #[arg(short = 'm', long)]
    mode: Option<ForwarderMode>,

    /// Upstream forwarder, may be repeated
    #[arg(short = 'f', long = "forwarder", value_name = "FORWARDER")]
    forwarders: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        port: cli.port,
        bind_address: cli.bind,
        mode: cli.mode,
        forwarders: cli.forwarders,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting Sieve DNS v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config).await?;
    let shutdown = CancellationToken::new();

    let mut jobs = JobRunner::new().with_shutdown_token(shutdown.clone());
    if let Some(cache) = &dns_services.cache {
        jobs = jobs.with_cache_maintenance(
            CacheMaintenanceJob::new(cache.clone()).with_interval(config.cache.purge_interval_secs),
        );
    }
    if config.lists.reload_interval_secs > 0 {
        jobs = jobs.with_list_reload(
            ListReloadJob::new(dns_services.lists.clone())
                .with_interval(config.lists.reload_interval_secs),
        );
    }
    if config.metrics.enabled {
        jobs = jobs.with_metrics_report(
            MetricsReportJob::new(dns_services.metrics.clone())
                .with_interval(config.metrics.report_interval_secs),
        );
    }
    jobs.start().await;

    let bind_addr = config.server.socket_addr()?;
    let dns_server = server::create_dns_server(bind_addr, &dns_services)?;
    let server_task = tokio::spawn(dns_server.run(shutdown.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
    shutdown.cancel();

    if let Err(e) = server_task.await {
        error!(error = %e, "DNS server task failed");
    }

    info!("Server shutdown complete");
    Ok(())
}
