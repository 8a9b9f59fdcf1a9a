use anyhow::Result;
use clap::Parser;
use csv::ReaderBuilder;
use log::{error, info};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    #[arg(
        long,
        default_value = "settings.json",
        help = "Path to the settings file"
    )]
    pub settings: String,

    #[arg(long, help = "Path to the account snapshot file (overrides settings)")]
    pub snapshot: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated list of customer IDs to process (manager runs only)"
    )]
    pub accounts: Vec<String>,

    #[arg(
        long = "accounts-file",
        value_delimiter = ',',
        help = "Comma-separated list of CSV files containing customer IDs"
    )]
    pub accounts_files: Vec<String>,

    #[arg(long, help = "Apply updates in memory without writing the snapshot back")]
    pub dry_run: bool,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let args = CommandLineArgs::parse();

        info!(
            "Parsed {} customer ID(s) from --accounts",
            args.accounts.len()
        );
        info!(
            "Parsed {} file(s) from --accounts-file",
            args.accounts_files.len()
        );
        if args.dry_run {
            info!("Dry run requested: the snapshot file will not be modified");
        }

        args
    }

    /// Merges --accounts and --accounts-file into the manager-run filter.
    /// None means every sub-account gets processed.
    pub fn account_filter(&self) -> Result<Option<HashSet<String>>> {
        let mut ids: HashSet<String> = self
            .accounts
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();

        for file_path in &self.accounts_files {
            ids.extend(customer_ids_from_file(file_path)?);
        }

        if ids.is_empty() {
            Ok(None)
        } else {
            Ok(Some(ids))
        }
    }
}

fn customer_ids_from_file(file_path: &str) -> Result<Vec<String>> {
    let path = Path::new(file_path);
    if !path.exists() {
        error!("File '{}' not found. Skipping...", file_path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // ID files carry bare values, no header row.
    let mut reader = ReaderBuilder::new().has_headers(false).from_reader(file);
    let mut result = Vec::new();

    for record in reader.records() {
        let record = record?;
        for field in record.iter() {
            let candidate = field.trim();
            if !candidate.is_empty() {
                result.push(candidate.to_string());
            }
        }
    }

    Ok(result)
}
