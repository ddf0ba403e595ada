pub mod http;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> Result<BackendBox> {
        let url = Config::get(ConfigKey::ApiUrl);
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!(format!("{url} is not a valid filings API url"))
        }

        return Ok(Box::<http::HttpBackend>::default());
    }
}
