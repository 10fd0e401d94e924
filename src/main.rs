//! corscheck - CORS misconfiguration probe CLI

use clap::{CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

use corscheck::config;
use corscheck::http::HttpClient;
use corscheck::models::{CorsResult, ProbeConfig};
use corscheck::report;
use corscheck::scanner::{CorsProber, ProbePool};
use corscheck::targets;

const DEFAULT_CONFIG: &str = "corscheck.toml";

/// corscheck - probe a URL list for CORS misconfigurations
#[derive(Parser)]
#[command(name = "corscheck", version, about, long_about = None)]
struct Cli {
    /// Path to the file containing URLs
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of concurrent workers [default: 70]
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Request timeout in seconds [default: 10]
    #[arg(long = "timeout", visible_alias = "to")]
    timeout: Option<u64>,

    /// Directory for the per-category JSON files [default: .]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP/HTTPS proxy URL
    #[arg(long)]
    proxy: Option<String>,

    /// User-Agent header value
    #[arg(long)]
    user_agent: Option<String>,

    /// Do not follow redirects
    #[arg(long)]
    no_redirects: bool,

    /// Do not print each finding as JSON
    #[arg(short, long)]
    silent: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_banner() {
    let banner = r#"
      ____ ___  ____  ____       _               _
     / ___/ _ \|  _ \/ ___|  ___| |__   ___  ___| | __
    | |  | | | | |_) \___ \ / __| '_ \ / _ \/ __| |/ /
    | |__| |_| |  _ < ___) | (__| | | |  __/ (__|   <
     \____\___/|_| \_\____/ \___|_| |_|\___|\___|_|\_\
    "#;
    println!("{}", banner.cyan());
}

fn print_summary(results: &[CorsResult]) {
    println!("\n{}", "  Probe Summary".bold());
    println!("  {}", "─".repeat(35));

    let mut builder = Builder::default();
    builder.push_record(["Category", "Count"]);
    for (category, bucket) in report::group_by_category(results) {
        builder.push_record([category.to_string(), bucket.len().to_string()]);
    }
    builder.push_record(["Total".to_string(), results.len().to_string()]);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

fn load_probe_config(path: Option<&Path>) -> corscheck::error::Result<ProbeConfig> {
    match path {
        Some(path) => config::load_config(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG);
            if default_path.exists() {
                config::load_config(default_path)
            } else {
                Ok(ProbeConfig::default())
            }
        }
    }
}

fn progress_bar(verbose: bool) -> ProgressBar {
    if verbose {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

/// Stderr writer that clears the progress bar around each log line
struct BarWriter(ProgressBar);

impl Write for BarWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "corscheck=debug"
    } else {
        "corscheck=info"
    };
    let progress = progress_bar(cli.verbose);
    let log_bar = progress.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(move || BarWriter(log_bar.clone()))
        .init();

    print_banner();

    let Some(file) = cli.file else {
        Cli::command().print_help()?;
        std::process::exit(1);
    };

    let mut probe_config = load_probe_config(cli.config.as_deref())?;
    config::merge_cli_args(
        &mut probe_config,
        cli.concurrency,
        cli.timeout,
        cli.user_agent,
        cli.proxy,
        cli.output_dir,
        cli.no_redirects,
    );

    let urls = match targets::load_targets(&file) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("  {} reading {}: {e}", "Error".red().bold(), file.display());
            std::process::exit(1);
        }
    };

    println!("  {} {}", "Targets:".bold(), urls.len().to_string().green());
    println!(
        "  {} {}\n",
        "Workers:".bold(),
        probe_config.workers.to_string().cyan()
    );

    let client = HttpClient::from_config(&probe_config)?;
    let prober = CorsProber::new(client.clone());
    let pool = ProbePool::new(Arc::new(prober), probe_config.workers)
        .with_progress(progress.clone());

    let mut rx = pool.spawn(urls);
    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        if !cli.silent {
            let json = serde_json::to_string_pretty(&result)?;
            progress.suspend(|| println!("{json}"));
        }
        results.push(result);
    }

    print_summary(&results);
    println!(
        "  {} {}",
        "Requests sent:".bold(),
        client.request_count().to_string().cyan()
    );

    let written = report::json::write_categorized(&results, &probe_config.output_dir)?;
    if written.is_empty() {
        println!("\n  {}", "Better luck next time...".yellow());
    } else {
        println!("\n  {}", "Results are saved in the files below:".bold());
        for path in written {
            println!("    {}", path.display().to_string().green());
        }
    }

    Ok(())
}
