/// Builds the UTM fragment appended to campaign final URLs. The `{_name}`
/// and `{campaignid}` placeholders are substituted by the ad platform at
/// click time, not by this tool.
pub fn final_url_suffix_tracker(custom_parameter_name: &str) -> String {
    format!(
        "utm_source=google&utm_source_platform=GoogleAds&utm_medium=cpc&utm_campaign={{_{}}}&utm_campaignid={{campaignid}}",
        custom_parameter_name
    )
}
