use anyhow::Context;
use clap::Parser;
use gh_repos::utils::error::{ErrorCategory, FetchError};
use gh_repos::utils::{logger, validation::Validate};
use gh_repos::{CliConfig, Record, RepoFetcher, RepoSummary};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let result = cli.fetch_config().and_then(|config| {
        config.validate()?;
        tracing::debug!("Fetch config: {:?}", config);
        RepoFetcher::from_config(&config)?.get_repos(&cli.username)
    });

    match result {
        Ok(records) => {
            tracing::info!("Fetched {} repositories for {}", records.len(), cli.username);
            print_records(&records, cli.names_only)
        }
        Err(e) => {
            tracing::error!("❌ Fetch failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

fn print_records(records: &[Record], names_only: bool) -> anyhow::Result<()> {
    if names_only {
        for record in records {
            match RepoSummary::from_record(record) {
                Some(summary) => println!("{}", summary.full_name),
                None => tracing::warn!("Skipping record without full_name"),
            }
        }
        return Ok(());
    }

    let json = serde_json::to_string_pretty(records).context("failed to render records as JSON")?;
    println!("{}", json);
    Ok(())
}

fn exit_code(error: &FetchError) -> i32 {
    match error.category() {
        ErrorCategory::Decode => 1,
        ErrorCategory::Network => 2,
        ErrorCategory::Request | ErrorCategory::Configuration => 3,
    }
}
