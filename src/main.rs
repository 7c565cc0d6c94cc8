use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use config::{initialize_config, UserConfig};
use controller::Appraiser;
use entity::{FileReport, PNPM_WORKSPACE};
use tracing::{error, info};

mod config;
mod controller;
mod entity;
mod error;
mod usecase;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    ///workspace files, or directories containing a pnpm-workspace.yaml
    #[arg(default_value = PNPM_WORKSPACE)]
    paths: Vec<String>,
    ///directory the paths are relative to
    #[arg(short = 'C', long)]
    cwd: Option<PathBuf>,
    ///only update matching dependencies. `/re/` for a regex, `*` as wildcard
    #[arg(short, long)]
    include: Vec<String>,
    ///never update matching dependencies, wins over --include
    #[arg(short = 'x', long)]
    exclude: Vec<String>,
    ///pin a dependency to a version, e.g. react=^19.0.0
    #[arg(short = 's', long = "set", value_parser = parse_pin)]
    pins: Vec<(String, String)>,
    ///JSON config file with include, exclude, pins and write
    #[arg(short, long)]
    config: Option<PathBuf>,
    ///write the changes back instead of only reporting them
    #[arg(short, long)]
    write: bool,
    ///print reports as JSON
    #[arg(long)]
    json: bool,
}

fn parse_pin(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, version)) if !name.is_empty() && !version.is_empty() => {
            Ok((name.to_string(), version.to_string()))
        }
        _ => Err(format!("expected NAME=VERSION, got `{}`", s)),
    }
}

fn setup(args: &Args) -> anyhow::Result<PathBuf> {
    let user_config = match &args.config {
        Some(path) => UserConfig::from_file(path)?,
        None => UserConfig::default(),
    };
    initialize_config(user_config.merge(
        args.include.clone(),
        args.exclude.clone(),
        args.pins.clone(),
        args.write,
    ))?;

    let cwd = match &args.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().context("Failed to get the current directory")?,
    };
    dunce::canonicalize(&cwd).with_context(|| format!("Failed to resolve {}", cwd.display()))
}

fn print_reports(reports: &[FileReport], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
    } else {
        for report in reports {
            print!("{}", report);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    //logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cwd = match setup(&args) {
        Ok(cwd) => cwd,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let reports = Appraiser::new(cwd).run(&args.paths).await;
    if let Err(e) = print_reports(&reports, args.json) {
        error!("error printing reports: {:#}", e);
        return ExitCode::FAILURE;
    }

    let failed = reports.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        info!("{} of {} files failed", failed, reports.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
