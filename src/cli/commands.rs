use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedscan")]
#[command(about = "Discover and validate RSS/Atom feeds of news sites")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a list of news sites and discover their RSS/Atom feeds
    Scan {
        /// Where the list of sites comes from (wikidata, file)
        #[arg(long, default_value = "wikidata")]
        source: String,

        /// Sites file for --source file (one `url` or `name,url` per line)
        #[arg(long)]
        sites_file: Option<String>,

        /// Maximum number of sites to process
        #[arg(long, default_value_t = 200)]
        max_sites: usize,

        /// Number of sites scanned in parallel
        #[arg(long, env = "FEEDSCAN_MAX_WORKERS", default_value_t = 20)]
        max_workers: usize,

        /// HTTP timeout in seconds
        #[arg(long, env = "FEEDSCAN_TIMEOUT", default_value_t = 15.0)]
        timeout: f64,

        /// Maximum feed candidates checked per site
        #[arg(long, default_value_t = 25)]
        max_candidates: usize,

        /// Maximum valid feeds kept per site
        #[arg(long, default_value_t = 5)]
        max_feeds: usize,

        /// Output directory for feeds.json, feeds.csv and topics.json
        #[arg(long)]
        out_dir: Option<String>,
    },

    /// Summarize topics from a scan JSON file
    Report {
        /// Scan JSON file produced by `scan`
        #[arg(long)]
        input: String,

        /// Output file (prints to stdout if not specified)
        #[arg(short, long)]
        out: Option<String>,

        /// Drop topics seen in fewer feeds than this
        #[arg(long, default_value_t = 2)]
        min_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(["feedscan", "scan"]);
        match cli.command {
            Commands::Scan {
                source,
                sites_file,
                max_sites,
                max_candidates,
                max_feeds,
                out_dir,
                ..
            } => {
                assert_eq!(source, "wikidata");
                assert!(sites_file.is_none());
                assert_eq!(max_sites, 200);
                assert_eq!(max_candidates, 25);
                assert_eq!(max_feeds, 5);
                assert!(out_dir.is_none());
            }
            Commands::Report { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::parse_from(["feedscan", "report", "--input", "data/feeds.json", "-o", "t.json"]);
        match cli.command {
            Commands::Report {
                input,
                out,
                min_count,
            } => {
                assert_eq!(input, "data/feeds.json");
                assert_eq!(out.as_deref(), Some("t.json"));
                assert_eq!(min_count, 2);
            }
            Commands::Scan { .. } => panic!("expected report"),
        }
    }

    #[test]
    fn test_report_requires_input() {
        assert!(Cli::try_parse_from(["feedscan", "report"]).is_err());
    }
}
