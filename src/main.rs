use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::time::Instant;

use campaign_tagger::ads::{back_up_snapshot, AccountSnapshot};
use campaign_tagger::cli_args::CommandLineArgs;
use campaign_tagger::processor::{self, RunStats};
use campaign_tagger::settings::Settings;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start_time = Instant::now();
    info!(
        "Campaign Tagger v{} starting up...",
        env!("CARGO_PKG_VERSION")
    );

    let cli_args = CommandLineArgs::parse_args();

    let settings = Settings::load(&cli_args.settings)?;
    let snapshot_file = cli_args
        .snapshot
        .clone()
        .unwrap_or_else(|| settings.snapshot_file.clone());

    let mut snapshot = AccountSnapshot::load(&snapshot_file)?;
    let account_filter = cli_args.account_filter()?;

    let pb = create_progress_bar(snapshot.accounts.len());
    let stats = processor::run(&mut snapshot, &settings, account_filter, &pb)?;
    finish_processing(&pb, &stats);

    persist_snapshot(
        &snapshot,
        &snapshot_file,
        &settings,
        cli_args.dry_run,
        &stats,
    )?;
    log_summary(&stats);

    let elapsed = start_time.elapsed();
    info!(
        "Processing completed in {:.2} seconds",
        elapsed.as_secs_f64()
    );

    Ok(())
}

fn create_progress_bar(total_accounts: usize) -> ProgressBar {
    let pb = ProgressBar::new(total_accounts as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn finish_processing(pb: &ProgressBar, stats: &RunStats) {
    pb.finish_with_message(format!(
        "Completed! {} account(s), {} campaign(s)",
        stats.accounts_processed, stats.campaigns_seen
    ));
}

fn persist_snapshot(
    snapshot: &AccountSnapshot,
    snapshot_file: &str,
    settings: &Settings,
    dry_run: bool,
    stats: &RunStats,
) -> Result<()> {
    if dry_run {
        info!(
            "Dry run: {} change(s) computed but not written to '{}'",
            stats.mutations(),
            snapshot_file
        );
        return Ok(());
    }

    if stats.mutations() == 0 {
        info!("No changes to persist");
        return Ok(());
    }

    if settings.backup_before_write {
        let backup_path = back_up_snapshot(snapshot_file)?;
        info!("Backed up snapshot to '{}'", backup_path.display());
    }

    snapshot.save(snapshot_file)?;
    info!(
        "Wrote {} change(s) to '{}'",
        stats.mutations(),
        snapshot_file
    );
    Ok(())
}

fn log_summary(stats: &RunStats) {
    info!("Accounts processed: {}", stats.accounts_processed);
    info!("Campaigns seen: {}", stats.campaigns_seen);
    info!("Custom parameters updated: {}", stats.parameters_updated);
    info!("Final URL suffixes updated: {}", stats.suffixes_updated);

    if stats.campaigns_skipped > 0 {
        warn!(
            "{} campaign(s) skipped due to errors; check the log above",
            stats.campaigns_skipped
        );
    }
}
