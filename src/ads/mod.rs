mod host;
mod snapshot;

pub use host::{Account, AccountIter, AdsHost, Campaign, CampaignIter, Channel};
pub use snapshot::{back_up_snapshot, AccountSnapshot, SnapshotAccount, SnapshotCampaign};
