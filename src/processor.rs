use anyhow::Result;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::ads::{Account, AdsHost, Campaign, CampaignIter, Channel};
use crate::sanitize::sanitize_campaign_name;
use crate::settings::Settings;
use crate::tracker::final_url_suffix_tracker;

/// Validated inputs shared by every account and campaign in one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub custom_parameter_name: String,
    pub add_to_final_url_suffix: bool,
    pub tracker: String,
    pub account_filter: Option<HashSet<String>>,
}

impl RunConfig {
    pub fn from_settings(
        settings: &Settings,
        account_filter: Option<HashSet<String>>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(RunConfig {
            custom_parameter_name: settings.custom_parameter_name.clone(),
            add_to_final_url_suffix: settings.add_to_campaign_final_url_suffix,
            tracker: final_url_suffix_tracker(&settings.custom_parameter_name),
            account_filter,
        })
    }

    fn wants_account(&self, customer_id: &str) -> bool {
        match &self.account_filter {
            Some(ids) => ids.contains(customer_id),
            None => true,
        }
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub accounts_processed: usize,
    pub campaigns_seen: usize,
    pub parameters_updated: usize,
    pub suffixes_updated: usize,
    pub campaigns_skipped: usize,
}

impl RunStats {
    pub fn merge(&mut self, other: &RunStats) {
        self.accounts_processed += other.accounts_processed;
        self.campaigns_seen += other.campaigns_seen;
        self.parameters_updated += other.parameters_updated;
        self.suffixes_updated += other.suffixes_updated;
        self.campaigns_skipped += other.campaigns_skipped;
    }

    pub fn mutations(&self) -> usize {
        self.parameters_updated + self.suffixes_updated
    }
}

/// Entry point: validates the configured parameter name, then processes
/// either every sub-account of a manager or the single active account.
pub fn run(
    host: &mut dyn AdsHost,
    settings: &Settings,
    account_filter: Option<HashSet<String>>,
    progress: &ProgressBar,
) -> Result<RunStats> {
    let config = RunConfig::from_settings(settings, account_filter)?;

    if host.is_manager() {
        process_manager_accounts(host, &config, progress)
    } else {
        let account = host.current_account()?;
        let mut stats = process_single_account(account, &config)?;
        stats.accounts_processed = 1;
        progress.inc(1);
        Ok(stats)
    }
}

/// Walks every sub-account of a manager. There is no per-account
/// recovery: a failing account aborts the run. Recovery only exists per
/// campaign, further down.
fn process_manager_accounts(
    host: &mut dyn AdsHost,
    config: &RunConfig,
    progress: &ProgressBar,
) -> Result<RunStats> {
    let mut stats = RunStats::default();

    for account in host.accounts()? {
        let customer_id = account.customer_id();
        if !config.wants_account(&customer_id) {
            debug!(
                "Skipping account {} (not in the account filter)",
                customer_id
            );
            continue;
        }

        progress.set_message(format!("Processing account \"{}\"", account.name()));
        let account_stats = process_single_account(account, config)?;
        stats.merge(&account_stats);
        stats.accounts_processed += 1;
        progress.inc(1);
    }

    Ok(stats)
}

/// Runs the update routine over the three campaign collections of one
/// account.
pub fn process_single_account(account: &mut dyn Account, config: &RunConfig) -> Result<RunStats> {
    info!("Processing account \"{}\"", account.name());

    let mut stats = RunStats::default();
    for channel in Channel::ALL {
        debug!("Scanning {} campaigns of \"{}\"", channel, account.name());
        let campaigns = account.campaigns(channel)?;
        add_custom_parameter_to_campaigns(campaigns, config, &mut stats);
    }

    Ok(stats)
}

#[derive(Debug, Default)]
struct CampaignChange {
    parameter_updated: bool,
    suffix_updated: bool,
    suffix_already_tracked: bool,
}

/// Ensures every campaign in the collection carries the tracking custom
/// parameter, optionally maintaining the final URL suffix.
fn add_custom_parameter_to_campaigns(
    campaigns: CampaignIter<'_>,
    config: &RunConfig,
    stats: &mut RunStats,
) {
    for campaign in campaigns {
        stats.campaigns_seen += 1;
        let campaign_id = campaign.id();

        match update_campaign(campaign, config) {
            Ok(change) => {
                if change.parameter_updated {
                    stats.parameters_updated += 1;
                    debug!("Updated custom parameter of campaign ID {}", campaign_id);
                }
                if change.suffix_updated {
                    stats.suffixes_updated += 1;
                    debug!("Updated final URL suffix of campaign ID {}", campaign_id);
                }
                if change.suffix_already_tracked {
                    // Ends the pass over the whole collection, not just
                    // this campaign.
                    debug!(
                        "Final URL suffix of campaign ID {} already tracked; \
                         leaving the rest of this collection as is",
                        campaign_id
                    );
                    break;
                }
            }
            Err(e) => {
                warn!("Skipping campaign ID {}: {}", campaign_id, e);
                stats.campaigns_skipped += 1;
            }
        }
    }
}

/// Applies the parameter and suffix updates to one campaign. An error
/// here skips only this campaign.
fn update_campaign(campaign: &mut dyn Campaign, config: &RunConfig) -> Result<CampaignChange> {
    let mut change = CampaignChange::default();
    let mut parameters = campaign.custom_parameters();

    let raw_name = campaign.name().unwrap_or_default();
    let campaign_name = sanitize_campaign_name(&raw_name)?;

    // Create or overwrite the parameter when it is missing or stale.
    if parameters.get(&config.custom_parameter_name) != Some(&campaign_name) {
        parameters.insert(config.custom_parameter_name.clone(), campaign_name);
        campaign.set_custom_parameters(parameters)?;
        change.parameter_updated = true;
    }

    if config.add_to_final_url_suffix {
        // An empty suffix on the platform side counts as no suffix.
        let existing = campaign.final_url_suffix().filter(|s| !s.is_empty());

        if let Some(suffix) = &existing {
            if suffix.contains(&config.tracker) {
                change.suffix_already_tracked = true;
                return Ok(change);
            }
        }

        let new_suffix = match existing {
            Some(suffix) => format!("{}&{}", suffix, config.tracker),
            None => config.tracker.clone(),
        };
        campaign.set_final_url_suffix(new_suffix)?;
        change.suffix_updated = true;
    }

    Ok(change)
}
