/// Configuration default values
///
/// All defaults live here so the config file written on first run and the
/// serde fallbacks stay in agreement.
// Remote API defaults
pub const DEFAULT_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_HD: bool = true;
pub const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;

// Imaging defaults
pub const DEFAULT_ASPECT_WIDTH: u32 = 16;
pub const DEFAULT_ASPECT_HEIGHT: u32 = 9;
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 128;

// Cache defaults
// The API publishes on US Eastern time, so the date key follows it
pub const DEFAULT_TIMEZONE: &str = "US/Eastern";
pub const DEFAULT_MARK_TRANSPORT_FAILURES: bool = false;

// Environment overrides
pub const ENV_API_KEY: &str = "APOD_API_KEY";
pub const ENV_BASE_PATH: &str = "APOD_BASE_PATH";

pub fn default_user_agent() -> String {
    format!("apod-wallpaper/{}", env!("CARGO_PKG_VERSION"))
}
