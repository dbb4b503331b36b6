use crate::errors::ToggleError;
use reqwest::Url;
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

pub fn resolve_base_url() -> Result<Url, ToggleError> {
    match env::var("ENROLL_BASE_URL") {
        Ok(raw) => parse_base_url(&raw),
        Err(_) => parse_base_url(DEFAULT_BASE_URL),
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ToggleError> {
    let url = Url::parse(raw.trim())
        .map_err(|err| ToggleError::Config(format!("ENROLL_BASE_URL {raw:?}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ToggleError::Config(format!(
            "ENROLL_BASE_URL must be an http(s) origin, got {raw:?}"
        )));
    }
    Ok(url)
}
