use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::host::{Account, AccountIter, AdsHost, Campaign, CampaignIter, Channel};

/// On-disk image of an advertiser account tree. Stands in for the hosted
/// ad platform: the binary loads it, mutates it through the host traits,
/// and writes it back at the end of a successful run.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccountSnapshot {
    /// True when the snapshot represents a manager (multi-account) tree.
    #[serde(default)]
    pub manager: bool,
    pub accounts: Vec<SnapshotAccount>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub campaigns: Vec<SnapshotCampaign>,
    #[serde(default)]
    pub shopping_campaigns: Vec<SnapshotCampaign>,
    #[serde(default)]
    pub performance_max_campaigns: Vec<SnapshotCampaign>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SnapshotCampaign {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub custom_parameters: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url_suffix: Option<String>,
}

impl AccountSnapshot {
    pub fn load(snapshot_file: &str) -> Result<Self> {
        let path = Path::new(snapshot_file);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Account snapshot not found at '{}'. Exiting...",
                snapshot_file
            ));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot file: {}", snapshot_file))?;

        let snapshot: AccountSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot file: {}", snapshot_file))?;

        if !snapshot.manager && snapshot.accounts.len() != 1 {
            return Err(anyhow::anyhow!(
                "Single-account snapshot '{}' must contain exactly one account, found {}",
                snapshot_file,
                snapshot.accounts.len()
            ));
        }

        info!(
            "Snapshot loaded from '{}' ({} account(s), manager: {})",
            snapshot_file,
            snapshot.accounts.len(),
            snapshot.manager
        );
        Ok(snapshot)
    }

    pub fn save(&self, snapshot_file: &str) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize account snapshot")?;

        fs::write(snapshot_file, contents)
            .with_context(|| format!("Failed to write snapshot file: {}", snapshot_file))?;

        debug!("Snapshot written to '{}'", snapshot_file);
        Ok(())
    }
}

/// Copies the snapshot to `<path>.<timestamp>.bak` before it gets
/// overwritten.
pub fn back_up_snapshot(snapshot_file: &str) -> Result<PathBuf> {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let backup_path = PathBuf::from(format!("{}.{}.bak", snapshot_file, stamp));

    fs::copy(snapshot_file, &backup_path)
        .with_context(|| format!("Failed to back up snapshot file: {}", snapshot_file))?;

    info!("Snapshot backed up to {:?}", backup_path);
    Ok(backup_path)
}

impl Campaign for SnapshotCampaign {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn custom_parameters(&self) -> HashMap<String, String> {
        self.custom_parameters.clone()
    }

    fn set_custom_parameters(&mut self, parameters: HashMap<String, String>) -> Result<()> {
        self.custom_parameters = parameters;
        Ok(())
    }

    fn final_url_suffix(&self) -> Option<String> {
        self.final_url_suffix.clone()
    }

    fn set_final_url_suffix(&mut self, suffix: String) -> Result<()> {
        self.final_url_suffix = Some(suffix);
        Ok(())
    }
}

impl Account for SnapshotAccount {
    fn customer_id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn campaigns(&mut self, channel: Channel) -> Result<CampaignIter<'_>> {
        let collection = match channel {
            Channel::Standard => &mut self.campaigns,
            Channel::Shopping => &mut self.shopping_campaigns,
            Channel::PerformanceMax => &mut self.performance_max_campaigns,
        };
        Ok(Box::new(
            collection.iter_mut().map(|c| c as &mut dyn Campaign),
        ))
    }
}

impl AdsHost for AccountSnapshot {
    fn is_manager(&self) -> bool {
        self.manager
    }

    fn accounts(&mut self) -> Result<AccountIter<'_>> {
        Ok(Box::new(
            self.accounts.iter_mut().map(|a| a as &mut dyn Account),
        ))
    }

    fn current_account(&mut self) -> Result<&mut dyn Account> {
        let account = self
            .accounts
            .first_mut()
            .ok_or_else(|| anyhow::anyhow!("Snapshot contains no accounts"))?;
        Ok(account as &mut dyn Account)
    }
}
