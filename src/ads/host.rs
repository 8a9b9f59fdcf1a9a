//! Contract between the update routine and whatever ad platform backs it.
//!
//! The platform ("host") owns accounts and campaigns; this tool only reads
//! them and persists targeted mutations through the setters below. Host
//! iterators are lazy, finite and non-restartable, so they are modeled as
//! plain [`Iterator`]s over mutable handles.

use anyhow::Result;
use std::collections::HashMap;
use std::fmt;

/// Campaign collections an account exposes. Every channel gets the same
/// update routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Standard,
    Shopping,
    PerformanceMax,
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::Standard,
        Channel::Shopping,
        Channel::PerformanceMax,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Standard => "standard",
            Channel::Shopping => "shopping",
            Channel::PerformanceMax => "performance-max",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One campaign handle. Getters read the host's current view; setters
/// persist back to the host and may fail.
pub trait Campaign {
    fn id(&self) -> u64;

    /// Campaign names can be absent on the platform side.
    fn name(&self) -> Option<String>;

    fn custom_parameters(&self) -> HashMap<String, String>;

    fn set_custom_parameters(&mut self, parameters: HashMap<String, String>) -> Result<()>;

    fn final_url_suffix(&self) -> Option<String>;

    fn set_final_url_suffix(&mut self, suffix: String) -> Result<()>;
}

pub type CampaignIter<'a> = Box<dyn Iterator<Item = &'a mut dyn Campaign> + 'a>;

pub type AccountIter<'a> = Box<dyn Iterator<Item = &'a mut dyn Account> + 'a>;

/// One advertiser account with its three campaign collections.
pub trait Account {
    fn customer_id(&self) -> String;

    fn name(&self) -> String;

    /// Fetches one campaign collection. A fetch failure aborts the whole
    /// account (and, under a manager, the run).
    fn campaigns(&mut self, channel: Channel) -> Result<CampaignIter<'_>>;
}

/// Entry point into the ad platform.
pub trait AdsHost {
    /// True when running against a manager (multi-account) context.
    fn is_manager(&self) -> bool;

    /// Enumerates a manager's sub-accounts in the order the host provides
    /// them; no sorting is guaranteed.
    fn accounts(&mut self) -> Result<AccountIter<'_>>;

    /// The active account when not running under a manager.
    fn current_account(&mut self) -> Result<&mut dyn Account>;
}
