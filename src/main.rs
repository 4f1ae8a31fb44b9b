use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use feedscan::cli::{Cli, Commands};
use feedscan::config::Config;
use feedscan::errors::ScanError;
use feedscan::http::make_fetcher;
use feedscan::services::{topic_summary, ScanOptions, ScanService};
use feedscan::sources::ProviderRegistry;
use feedscan::storage::{read_scan_json, write_json, write_scan_csv, write_scan_json};

/// Topic threshold used for the report written next to every scan.
const SCAN_TOPIC_MIN_COUNT: usize = 2;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            source,
            sites_file,
            max_sites,
            max_workers,
            timeout,
            max_candidates,
            max_feeds,
            out_dir,
        } => {
            let options = ScanOptions {
                max_sites: Some(max_sites),
                max_workers,
                max_candidates,
                max_feeds,
                timeout_s: timeout,
            };
            cmd_scan(&source, sites_file, options, out_dir)
        }
        Commands::Report {
            input,
            out,
            min_count,
        } => cmd_report(&input, out, min_count),
    }
}

fn cmd_scan(
    source: &str,
    sites_file: Option<String>,
    options: ScanOptions,
    out_dir: Option<String>,
) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let registry = match sites_file {
        Some(path) => ProviderRegistry::with_sites_file(path),
        None if source.eq_ignore_ascii_case("file") => {
            let message = "--source file requires --sites-file".to_string();
            return Err(ScanError::InvalidInput(message).into());
        }
        None => ProviderRegistry::new(),
    };
    let provider = registry.find(source)?;

    // Status retries only for the site list; site checks report 5xx as-is.
    let source_fetcher = make_fetcher(&config.http_config(options.timeout_s))?;
    let service = ScanService::new(source_fetcher.clone().transport_only(), options);

    println!("Scanning sites from {}...\n", provider.name());
    let result = service
        .run(provider, &source_fetcher)
        .with_context(|| format!("scan of {} sites failed", provider.name()))?;

    let out_dir = PathBuf::from(out_dir.unwrap_or(config.out_dir));
    let out_json = out_dir.join("feeds.json");
    let out_csv = out_dir.join("feeds.csv");
    let out_topics = out_dir.join("topics.json");

    write_scan_json(&out_json, &result)
        .with_context(|| format!("writing {}", out_json.display()))?;
    write_scan_csv(&out_csv, &result).with_context(|| format!("writing {}", out_csv.display()))?;
    write_json(&out_topics, &topic_summary(&result, SCAN_TOPIC_MIN_COUNT))
        .with_context(|| format!("writing {}", out_topics.display()))?;

    println!("{}", result.summary());
    println!(
        "Files: {} | {} | {}",
        out_json.display(),
        out_csv.display(),
        out_topics.display()
    );

    Ok(())
}

fn cmd_report(input: &str, out: Option<String>, min_count: usize) -> anyhow::Result<()> {
    let result =
        read_scan_json(Path::new(input)).with_context(|| format!("reading scan file {}", input))?;
    let report = topic_summary(&result, min_count);

    match out {
        Some(path) => {
            write_json(Path::new(&path), &report)?;
            println!("Report saved to {}", path);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
