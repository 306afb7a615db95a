//! resolve-check - report whether each domain resolves

use std::{fs::File, io::BufReader, net::IpAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use futures::StreamExt;
use resolvenet::{
    dns::{DnsResolverWithOverrides, GaiResolver, HickoryResolver, Resolve},
    probe::{input::domains_from_reader, AddressSelection, ProbeOptions, Prober, ResolutionResult},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Domains to check
    domains: Vec<String>,

    /// Read additional domains from a file, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Maximum number of lookups in flight
    #[arg(short, long, default_value_t = 8)]
    concurrency: usize,

    /// Per-lookup timeout in seconds (0 disables)
    #[arg(short, long, default_value_t = 5.0)]
    timeout: f64,

    /// Extra attempts for a failed lookup
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Print results as they complete instead of in input order
    #[arg(long)]
    unordered: bool,

    /// One lookup at a time with no timeout
    #[arg(long, conflicts_with_all = ["concurrency", "timeout"])]
    sequential: bool,

    /// Reject malformed names without looking them up
    #[arg(long)]
    validate: bool,

    /// Which resolver answers lookups
    #[arg(long, value_enum, default_value_t = ResolverKind::System, env = "RESOLVE_CHECK_RESOLVER")]
    resolver: ResolverKind,

    /// Static answer for a host, as HOST=IP (repeatable)
    #[arg(long = "resolve", value_name = "HOST=IP", value_parser = parse_override)]
    overrides: Vec<(String, IpAddr)>,

    /// Which address to report when a name has several
    /// [default: first, or ipv4-only with --sequential]
    #[arg(long, value_enum)]
    prefer: Option<Prefer>,

    /// Emit one JSON object per line
    #[arg(long)]
    json: bool,

    /// Append the failure kind and reason to failure lines
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResolverKind {
    /// getaddrinfo, same as any other program on this host
    System,
    /// hickory-dns using the system's nameserver configuration
    Hickory,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Prefer {
    First,
    Ipv4,
    Ipv6,
    Ipv4Only,
}

impl From<Prefer> for AddressSelection {
    fn from(prefer: Prefer) -> Self {
        match prefer {
            Prefer::First => AddressSelection::First,
            Prefer::Ipv4 => AddressSelection::PreferIpv4,
            Prefer::Ipv6 => AddressSelection::PreferIpv6,
            Prefer::Ipv4Only => AddressSelection::Ipv4Only,
        }
    }
}

fn parse_override(s: &str) -> Result<(String, IpAddr), String> {
    let (host, ip) = s
        .split_once('=')
        .ok_or_else(|| format!("expected HOST=IP, got '{s}'"))?;
    if host.is_empty() {
        return Err(format!("missing host in '{s}'"));
    }
    let ip = ip
        .parse::<IpAddr>()
        .map_err(|e| format!("invalid IP '{ip}': {e}"))?;
    Ok((host.to_string(), ip))
}

impl Cli {
    fn options(&self) -> Result<ProbeOptions> {
        let options = if self.sequential {
            ProbeOptions::sequential()
        } else {
            let timeout = match Duration::try_from_secs_f64(self.timeout) {
                Ok(timeout) => timeout,
                Err(e) => bail!("invalid timeout {}: {e}", self.timeout),
            };
            let options = ProbeOptions::new().concurrency(self.concurrency);
            if timeout.is_zero() {
                options.no_timeout()
            } else {
                options.timeout(timeout)
            }
        };

        let options = options
            .ordered_output(!self.unordered)
            .max_retries(self.retries)
            .validate_names(self.validate);
        Ok(match self.prefer {
            Some(prefer) => options.address_selection(prefer.into()),
            None => options,
        })
    }

    fn resolver(&self) -> Arc<dyn Resolve> {
        let base: Arc<dyn Resolve> = match self.resolver {
            ResolverKind::System => Arc::new(GaiResolver::new()),
            ResolverKind::Hickory => Arc::new(HickoryResolver::new()),
        };
        if self.overrides.is_empty() {
            return base;
        }

        let resolver = self
            .overrides
            .iter()
            .fold(DnsResolverWithOverrides::new(base), |r, (host, ip)| {
                r.with_override(host, *ip)
            });
        Arc::new(resolver)
    }

    fn domains(&self) -> Result<Vec<String>> {
        let mut domains = self.domains.clone();
        if let Some(path) = &self.file {
            let file = File::open(path)
                .with_context(|| format!("Failed to open domain list {}", path.display()))?;
            let listed = domains_from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to read domain list {}", path.display()))?;
            domains.extend(listed);
        }
        Ok(domains)
    }

    fn render(&self, result: &ResolutionResult) -> Result<String> {
        if self.json {
            return Ok(serde_json::to_string(result)?);
        }

        match (self.verbose, result.error_kind(), result.reason()) {
            (true, Some(kind), Some(reason)) => Ok(format!("{result} ({kind}: {reason})")),
            _ => Ok(result.to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let options = cli.options()?;
    let domains = cli.domains()?;
    let prober = Prober::with_options(cli.resolver(), options);

    let mut results = prober.probe(domains).context("Failed to start probe")?;

    let handle = results.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, abandoning outstanding lookups");
            handle.cancel();
        }
    });

    let (mut resolved, mut failed) = (0usize, 0usize);
    while let Some(result) = results.next().await {
        if result.is_resolved() {
            resolved += 1;
        } else {
            failed += 1;
        }
        println!("{}", cli.render(&result)?);
    }

    tracing::info!(resolved, failed, cancelled = results.is_cancelled(), "probe finished");
    Ok(())
}
