use std::{borrow::Cow, sync::OnceLock};

use rust_embed::RustEmbed;

/// Embed the entire `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static DEFAULT_RATES: OnceLock<String> = OnceLock::new();

/// Returns the contents of `assets/rates.json`, or an empty string when the
/// asset is missing so the JSON parser reports the problem.
pub fn default_rates_json() -> &'static str {
    DEFAULT_RATES
        .get_or_init(|| load_text("/assets/rates.json").unwrap_or_default())
        .as_str()
}

fn load_text(path: &str) -> Option<String> {
    let asset = load_asset(path)?;
    String::from_utf8(asset.into_owned()).ok()
}

fn load_asset(path: &str) -> Option<Cow<'static, [u8]>> {
    let canonical = canonical_asset_path(path);
    let asset = EmbeddedAssets::get(&canonical).map(|file| file.data);
    if asset.is_none() {
        tracing::error!("embedded asset {path} is missing");
    }
    asset
}

fn canonical_asset_path(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if let Some(rest) = trimmed.strip_prefix("assets/") {
        rest.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_strips_prefix() {
        assert_eq!(canonical_asset_path("/assets/rates.json"), "rates.json");
        assert_eq!(canonical_asset_path("rates.json"), "rates.json");
    }

    #[test]
    fn default_rates_are_embedded() {
        assert!(default_rates_json().contains("\"zones\""));
    }
}
