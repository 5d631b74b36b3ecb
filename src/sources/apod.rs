//! APOD API source
//!
//! `GET {endpoint}?api_key=..&date=YYYY-MM-DD&hd=True` returns one JSON
//! object describing the day's picture.

use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::errors::{AppError, AppResult};
use crate::models::DailyRecord;
use crate::utils::{HttpClient, UrlUtils};

#[derive(Debug, Clone)]
pub struct ApodSource {
    endpoint: String,
    api_key: String,
    hd: bool,
}

impl ApodSource {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            hd: config.hd,
        }
    }

    pub fn request_url(&self, date_key: &str) -> AppResult<String> {
        let mut params = vec![("api_key", self.api_key.as_str()), ("date", date_key)];
        if self.hd {
            params.push(("hd", "True"));
        }
        UrlUtils::with_query(&self.endpoint, &params)
            .map(String::from)
            .map_err(|e| AppError::configuration(format!("Invalid APOD endpoint: {e}")))
    }

    /// Fetch and validate the record for `date_key`.
    ///
    /// Network failures come back as `AppError::Transport`; a response that
    /// does not describe a downloadable still image is `MalformedResponse`.
    pub async fn fetch_metadata<C>(&self, client: &C, date_key: &str) -> AppResult<DailyRecord>
    where
        C: HttpClient + ?Sized,
    {
        let url = self.request_url(date_key)?;
        info!("Fetching APOD manifest for {}", date_key);

        let body = client.fetch_bytes(&url).await?;
        let record = DailyRecord::from_json(&body)?;
        info!("Got a response: {} ({})", record.title, record.date);

        if record.date != date_key {
            warn!("Requested {} but the API answered for {}", date_key, record.date);
        }

        Self::validate(&record)?;
        Ok(record)
    }

    /// A usable record is an image with a URL ending in a file extension
    pub fn validate(record: &DailyRecord) -> AppResult<()> {
        if !record.is_image() {
            return Err(AppError::malformed(format!(
                "APOD for {} is a {}, not an image",
                record.date,
                record.media_type.as_deref().unwrap_or("unknown media type")
            )));
        }

        let image_url = record.image_url().ok_or_else(|| {
            AppError::malformed(format!("APOD for {} has neither hdurl nor url", record.date))
        })?;

        if UrlUtils::path_extension(image_url).is_none() {
            return Err(AppError::malformed(format!(
                "Image URL has no file extension: {image_url}"
            )));
        }

        Ok(())
    }
}
