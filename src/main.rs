use clap::Parser;
use fetchurl::cli::Cli;
use fetchurl::logging;
use fetchurl::pipeline::PipelineBuilder;
use fetchurl::progress::ProgressBarOpts;
use fetchurl::report::Report;
use fetchurl::request::FetchOutcome;

use reqwest::header::{HeaderValue, USER_AGENT};
use std::io::Write;
use std::process::exit;

fn fatal(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("fetchurl: could not initialize logging: {}", e);
    }

    let request = cli.to_request().unwrap_or_else(|e| fatal(e));

    let mut builder = PipelineBuilder::new();
    if cli.quiet {
        builder = builder.progress(ProgressBarOpts::hidden());
    }
    if let Some(dir) = &cli.tmp_dir {
        builder = builder.temp_dir(dir);
    }
    if let Some(agent) = &cli.user_agent {
        let value = HeaderValue::from_str(agent)
            .unwrap_or_else(|e| fatal(format!("Invalid --user-agent {:?}: {}", agent, e)));
        builder = builder.header(USER_AGENT, value);
    }
    let pipeline = builder
        .build()
        .unwrap_or_else(|e| fatal(format!("Could not set up the HTTP client: {}", e)));

    print!("Downloading '{}'...", request.url());
    let _ = std::io::stdout().flush();

    let outcome = match pipeline.run(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!();
            fatal(e);
        }
    };
    println!(" Done!");

    match outcome {
        FetchOutcome::Stored(path) => println!("Downloaded to {}", path.display()),
        FetchOutcome::Unpacked(path) => println!("Unpacked to {}", path.display()),
        FetchOutcome::Reported { url, digest } => {
            print!("{}", Report::new(url, digest).render(cli.report_style()));
        }
    }
}
