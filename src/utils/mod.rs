pub mod http_client;
pub mod time;
pub mod url;

pub use http_client::{HttpClient, StandardHttpClient};
pub use time::{date_key_at, parse_date_key, today_key};
pub use url::UrlUtils;
