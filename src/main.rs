//! Buildship CLI
//!
//! Entry point for the `buildship` command-line tool. Drives one pipeline
//! invocation from files on disk: a publisher config (TOML), a build record
//! (JSON), and a deploy candidate list (JSON).

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;

use buildship::publish::PublishMode;
use buildship::record::load_record;
use buildship::repository::DryRunClient;
use buildship::{DeployCandidate, Publisher, PublisherConfig};

#[derive(Parser)]
#[command(name = "buildship")]
#[command(about = "Reconcile and publish build artifacts", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reconcile-and-publish pipeline once
    Publish {
        /// Path to the publisher config file (TOML)
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Path to the build record produced by the build (JSON)
        #[arg(long)]
        build_info: PathBuf,

        /// Path to the deploy candidate list (JSON array)
        #[arg(long)]
        candidates: PathBuf,

        /// Build base directory, used for the default export location
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,

        /// Treat the build as unstable (tests failed)
        #[arg(long)]
        test_failures: bool,

        /// Log deploys instead of performing them
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            config,
            build_info,
            candidates,
            base_dir,
            test_failures,
            dry_run,
        } => {
            run_publish(config, build_info, candidates, base_dir, test_failures, dry_run);
        }
    }
}

fn run_publish(
    config_path: PathBuf,
    build_info_path: PathBuf,
    candidates_path: PathBuf,
    base_dir: PathBuf,
    test_failures: bool,
    dry_run: bool,
) {
    let config = match PublisherConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    // This binary ships no remote transport; remote publishing works only in
    // dry-run mode, while accumulation and local export are fully supported
    let publishing_remotely = config.accumulate_dir.is_none()
        && (config.publish_artifacts || config.publish_build_info);
    if publishing_remotely && !dry_run {
        eprintln!(
            "Error: no repository transport configured; re-run with --dry-run \
             or set 'accumulate_dir' in {}",
            config_path.display()
        );
        process::exit(1);
    }

    let mut record = match load_record(&build_info_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading build record: {}", e);
            process::exit(40);
        }
    };

    let candidates = match load_candidates(&candidates_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading deploy candidates: {}", e);
            process::exit(1);
        }
    };

    let publisher = Publisher::new(
        config,
        Box::new(|_| Ok(Box::new(DryRunClient) as Box<dyn buildship::RepositoryClient>)),
    );

    match publisher.run(&mut record, &candidates, test_failures, &base_dir) {
        Ok(report) => {
            println!("Build info exported to {}", report.export_path.display());
            match report.mode {
                PublishMode::Accumulated => println!(
                    "Accumulated {} artifact(s), {} copy failure(s)",
                    report.accumulated, report.copy_failures
                ),
                PublishMode::Published => println!(
                    "Deployed {} artifact(s), {} skipped by patterns, build info sent: {}",
                    report.deployed,
                    report.skipped_by_pattern.len(),
                    report.build_info_sent
                ),
                PublishMode::LocalOnly => println!("Publishing disabled, local export only"),
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn load_candidates(
    path: &PathBuf,
) -> Result<HashMap<String, DeployCandidate>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let list: Vec<DeployCandidate> = serde_json::from_str(&contents)?;
    Ok(list
        .into_iter()
        .map(|c| (c.artifact_id.clone(), c))
        .collect())
}
