//! Logo loading: embedded data URLs, remote images or local image files

use base64::{engine::general_purpose, Engine as _};
use log::debug;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

use crate::error::{ProjectorError, Result};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Remote logos get one attempt within this window
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Identify the format from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A decoded, validated logo image
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl Logo {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = ImageFormat::sniff(&bytes)
            .ok_or_else(|| ProjectorError::Logo("unrecognized image format".into()))?;
        Ok(Self { format, bytes })
    }

    /// `data:` URL suitable for embedding in HTML
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Load a logo from a profile reference.
///
/// Accepts `data:<mime>;base64,<payload>` URLs, `http(s)` URLs and local
/// file paths. Remote images are fetched once with no retry.
pub async fn load_logo(reference: &str) -> Result<Logo> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ProjectorError::Logo("empty logo reference".into()));
    }

    if let Some(rest) = reference.strip_prefix("data:") {
        return decode_data_url(rest);
    }

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return fetch_remote(reference).await;
    }

    let path = Path::new(reference);
    let bytes = tokio::fs::read(path).await.map_err(|source| ProjectorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} byte logo from {}", bytes.len(), path.display());
    Logo::from_bytes(bytes)
}

async fn fetch_remote(url: &str) -> Result<Logo> {
    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| ProjectorError::Logo(format!("HTTP client unavailable: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProjectorError::Logo(format!("fetching {}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(ProjectorError::Logo(format!(
            "fetching {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProjectorError::Logo(format!("reading {}: {}", url, e)))?;
    debug!("fetched {} byte logo from {}", bytes.len(), url);
    Logo::from_bytes(bytes.to_vec())
}

fn decode_data_url(rest: &str) -> Result<Logo> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ProjectorError::Logo("malformed data URL".into()))?;
    if !meta.ends_with(";base64") {
        return Err(ProjectorError::Logo("data URL is not base64 encoded".into()));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ProjectorError::Logo(format!("invalid base64 payload: {}", e)))?;
    Logo::from_bytes(bytes)
}
