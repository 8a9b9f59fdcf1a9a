use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Ad platforms cap custom parameter values at 250 characters.
const MAX_CUSTOM_PARAMETER_VALUE_LEN: usize = 250;

static INVALID_SYMBOLS: OnceLock<Regex> = OnceLock::new();

fn invalid_symbols() -> &'static Regex {
    INVALID_SYMBOLS
        .get_or_init(|| Regex::new(r"[^a-zA-Z0-9|;_/^(!]").expect("Failed to compile name pattern"))
}

/// Produces a tracking-safe copy of a campaign name: the first 250
/// characters, with every symbol the platform rejects replaced by `_`.
/// Fails when the name is empty.
pub fn sanitize_campaign_name(campaign_name: &str) -> Result<String> {
    if campaign_name.is_empty() {
        return Err(anyhow::anyhow!("Missing campaign name!"));
    }

    let truncated: String = campaign_name
        .chars()
        .take(MAX_CUSTOM_PARAMETER_VALUE_LEN)
        .collect();

    Ok(invalid_symbols().replace_all(&truncated, "_").into_owned())
}
