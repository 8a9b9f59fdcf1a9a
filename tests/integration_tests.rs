use campaign_tagger::*;
use indicatif::ProgressBar;
use serde_json::json;
use tempfile::{tempdir, TempDir};

#[cfg(test)]
mod tests {
    use super::*;

    const TRACKER: &str = "utm_source=google&utm_source_platform=GoogleAds&utm_medium=cpc\
                           &utm_campaign={_campaignname}&utm_campaignid={campaignid}";

    fn setup_temp_dir() -> TempDir {
        tempdir().unwrap()
    }

    fn test_settings(add_suffix: bool) -> Settings {
        Settings {
            custom_parameter_name: "campaignname".to_string(),
            add_to_campaign_final_url_suffix: add_suffix,
            snapshot_file: "accounts.json".to_string(),
            backup_before_write: true,
        }
    }

    fn single_account_json() -> serde_json::Value {
        json!({
            "manager": false,
            "accounts": [
                {
                    "id": "123-456-7890",
                    "name": "Acme Retail",
                    "campaigns": [
                        { "id": 1001, "name": "Sale 2024!" },
                        { "id": 1002, "name": "Brand | Search", "final_url_suffix": "foo=bar" }
                    ],
                    "shopping_campaigns": [
                        { "id": 2001, "name": "Shopping Feed" }
                    ]
                }
            ]
        })
    }

    fn manager_json() -> serde_json::Value {
        json!({
            "manager": true,
            "accounts": [
                {
                    "id": "111-111-1111",
                    "name": "First Client",
                    "campaigns": [{ "id": 1, "name": "One" }]
                },
                {
                    "id": "222-222-2222",
                    "name": "Second Client",
                    "campaigns": [{ "id": 2, "name": "Two" }]
                }
            ]
        })
    }

    fn write_snapshot(temp_dir: &TempDir, value: &serde_json::Value) -> String {
        let path = temp_dir.path().join("accounts.json");
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_single_account_run_updates_parameters() {
        let temp_dir = setup_temp_dir();
        let snapshot_file = write_snapshot(&temp_dir, &single_account_json());

        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        let stats = processor::run(
            &mut snapshot,
            &test_settings(false),
            None,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(stats.accounts_processed, 1);
        assert_eq!(stats.campaigns_seen, 3);
        assert_eq!(stats.parameters_updated, 3);
        assert_eq!(stats.suffixes_updated, 0);
        assert_eq!(stats.campaigns_skipped, 0);

        let account = &snapshot.accounts[0];
        assert_eq!(
            account.campaigns[0].custom_parameters["campaignname"],
            "Sale_2024!"
        );
        assert_eq!(
            account.campaigns[1].custom_parameters["campaignname"],
            "Brand_|_Search"
        );
        assert_eq!(
            account.shopping_campaigns[0].custom_parameters["campaignname"],
            "Shopping_Feed"
        );

        // Suffix maintenance is off, so the existing suffix survives as is.
        assert_eq!(
            account.campaigns[1].final_url_suffix.as_deref(),
            Some("foo=bar")
        );
    }

    #[test]
    fn test_changes_stay_in_memory_until_saved() {
        let temp_dir = setup_temp_dir();
        let snapshot_file = write_snapshot(&temp_dir, &single_account_json());
        let before = std::fs::read_to_string(&snapshot_file).unwrap();

        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        processor::run(
            &mut snapshot,
            &test_settings(false),
            None,
            &ProgressBar::hidden(),
        )
        .unwrap();

        // Nothing hits the disk until save is called.
        let after = std::fs::read_to_string(&snapshot_file).unwrap();
        assert_eq!(before, after);

        snapshot.save(&snapshot_file).unwrap();
        let reloaded = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        assert_eq!(
            reloaded.accounts[0].campaigns[0].custom_parameters["campaignname"],
            "Sale_2024!"
        );
    }

    #[test]
    fn test_suffix_tracker_applied_end_to_end() {
        let temp_dir = setup_temp_dir();
        let snapshot_file = write_snapshot(&temp_dir, &single_account_json());

        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        let stats = processor::run(
            &mut snapshot,
            &test_settings(true),
            None,
            &ProgressBar::hidden(),
        )
        .unwrap();

        let account = &snapshot.accounts[0];
        assert_eq!(account.campaigns[0].final_url_suffix.as_deref(), Some(TRACKER));
        assert_eq!(
            account.campaigns[1].final_url_suffix,
            Some(format!("foo=bar&{}", TRACKER))
        );
        assert_eq!(
            account.shopping_campaigns[0].final_url_suffix.as_deref(),
            Some(TRACKER)
        );
        assert_eq!(stats.suffixes_updated, 3);
    }

    #[test]
    fn test_tracked_suffix_halts_collection_end_to_end() {
        let temp_dir = setup_temp_dir();
        let tracked = json!({
            "manager": false,
            "accounts": [
                {
                    "id": "123-456-7890",
                    "name": "Acme Retail",
                    "campaigns": [
                        { "id": 1, "name": "Already Tracked", "final_url_suffix": TRACKER },
                        { "id": 2, "name": "Fresh" }
                    ]
                }
            ]
        });
        let snapshot_file = write_snapshot(&temp_dir, &tracked);

        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        let stats = processor::run(
            &mut snapshot,
            &test_settings(true),
            None,
            &ProgressBar::hidden(),
        )
        .unwrap();

        let account = &snapshot.accounts[0];
        assert_eq!(
            account.campaigns[0].custom_parameters["campaignname"],
            "Already_Tracked"
        );
        assert!(account.campaigns[1].custom_parameters.is_empty());
        assert_eq!(account.campaigns[1].final_url_suffix, None);
        assert_eq!(stats.campaigns_seen, 1);
    }

    #[test]
    fn test_manager_snapshot_processes_sub_accounts() {
        let temp_dir = setup_temp_dir();
        let snapshot_file = write_snapshot(&temp_dir, &manager_json());

        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        let stats = processor::run(
            &mut snapshot,
            &test_settings(false),
            None,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert_eq!(stats.accounts_processed, 2);
        assert_eq!(
            snapshot.accounts[0].campaigns[0].custom_parameters["campaignname"],
            "One"
        );
        assert_eq!(
            snapshot.accounts[1].campaigns[0].custom_parameters["campaignname"],
            "Two"
        );
    }

    #[test]
    fn test_settings_file_drives_parameter_name() {
        let temp_dir = setup_temp_dir();
        let settings_path = temp_dir.path().join("settings.json");
        std::fs::write(
            &settings_path,
            serde_json::to_string_pretty(&json!({
                "custom_parameter_name": "promo",
                "add_to_campaign_final_url_suffix": true
            }))
            .unwrap(),
        )
        .unwrap();

        let settings = Settings::load(settings_path.to_str().unwrap()).unwrap();
        assert!(settings.backup_before_write);

        let snapshot_file = write_snapshot(&temp_dir, &single_account_json());
        let mut snapshot = ads::AccountSnapshot::load(&snapshot_file).unwrap();
        processor::run(&mut snapshot, &settings, None, &ProgressBar::hidden()).unwrap();

        let account = &snapshot.accounts[0];
        assert_eq!(account.campaigns[0].custom_parameters["promo"], "Sale_2024!");
        let suffix = account.campaigns[0].final_url_suffix.clone().unwrap();
        assert!(suffix.contains("utm_campaign={_promo}"));
    }

    #[test]
    fn test_back_up_snapshot_writes_timestamped_copy() {
        let temp_dir = setup_temp_dir();
        let snapshot_file = write_snapshot(&temp_dir, &single_account_json());

        let backup_path = ads::back_up_snapshot(&snapshot_file).unwrap();
        assert!(backup_path.exists());
        assert!(backup_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with(".bak"));

        let original = std::fs::read_to_string(&snapshot_file).unwrap();
        let copy = std::fs::read_to_string(&backup_path).unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn test_bundled_fixture_files_load() {
        let settings = Settings::load("settings.json").unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.custom_parameter_name, "campaignname");

        let snapshot = ads::AccountSnapshot::load(&settings.snapshot_file).unwrap();
        assert!(snapshot.manager);
        assert!(!snapshot.accounts.is_empty());
    }
}
