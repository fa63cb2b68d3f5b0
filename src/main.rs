// css-purge: command-line driver for the purge pipeline
//
// Purges the stylesheets linked from one page and writes the result into a
// fresh run directory under the configured output directory.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use css_purge::{HttpFetcher, PageSource, PurgeConfig, PurgeError, run};

#[derive(Debug, Parser)]
#[command(name = "css-purge", version, about = "Purge unused CSS from a page's stylesheets")]
struct Cli {
    /// Page URL (http/https) or path to a local HTML file
    target: String,

    /// Split the result into one file per media query
    #[arg(long)]
    split: bool,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory, overriding the configured one
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also print the purged CSS to stdout
    #[arg(long)]
    stdout: bool,
}

fn load_config(cli: &Cli) -> Result<PurgeConfig, PurgeError> {
    let config = match &cli.config {
        Some(path) => PurgeConfig::from_file(path)?,
        None => PurgeConfig::default(),
    };
    Ok(match &cli.out {
        Some(dir) => config.with_output_dir(dir),
        None => config,
    })
}

async fn execute(cli: Cli) -> Result<(), PurgeError> {
    let config = Arc::new(load_config(&cli)?);
    let fetcher = HttpFetcher::new(&config)?;
    let source = PageSource::from_target(&cli.target);

    let (output, workspace) = run(&source, config, &fetcher, cli.split).await?;

    for skipped in &output.report.skipped {
        eprintln!("skipped {}: {}", skipped.url, skipped.cause);
    }

    match &output.split {
        Some(split) => {
            println!("{}", workspace.split_dir().display());
            for key in split.keys() {
                println!("  {key}.css");
            }
        }
        None => println!("{}", workspace.root().display()),
    }

    if cli.stdout {
        if let Some(headers) = output.download_headers() {
            for (name, value) in headers {
                log::debug!("{name}: {value}");
            }
        }
        println!("{}", output.css);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
