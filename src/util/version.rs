pub const APP_NAME: &str = "Roads of Babel";
pub const APP_REPO_URL: &str = "https://roadsofbabel.com";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// `User-Agent` sent to every service.
pub fn user_agent() -> String {
    format!("roads-of-babel/{} (+{})", version_label(), APP_REPO_URL)
}
