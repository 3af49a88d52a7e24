//! Business profile lookup

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::DEFAULT_BUSINESS_NAME;
use crate::error::{ProjectorError, Result};

/// Branding fields of the signed-in user's business
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: Option<String>,
    /// Data URL or local path
    pub logo: Option<String>,
}

impl BusinessProfile {
    pub fn display_name(&self) -> &str {
        self.business_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_BUSINESS_NAME)
    }
}

/// Source of branding for the report header
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_profile(&self) -> Result<BusinessProfile>;
}

/// Fixed profile, e.g. from CLI flags or an already-fetched record
#[derive(Debug, Clone, Default)]
pub struct StaticProfile {
    profile: BusinessProfile,
}

impl StaticProfile {
    pub fn new(profile: BusinessProfile) -> Self {
        Self { profile }
    }
}

#[async_trait]
impl ProfileProvider for StaticProfile {
    async fn fetch_profile(&self) -> Result<BusinessProfile> {
        Ok(self.profile.clone())
    }
}

/// Profile record as stored by the CRM. Several column names have been used
/// over time for the same field.
#[derive(Debug, Default, Deserialize)]
struct StoredProfile {
    business_name: Option<String>,
    company_name: Option<String>,
    logo_base64: Option<String>,
    logo_url: Option<String>,
    logo: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<StoredProfile> for BusinessProfile {
    fn from(stored: StoredProfile) -> Self {
        Self {
            business_name: non_blank(stored.business_name).or(non_blank(stored.company_name)),
            logo: non_blank(stored.logo_base64)
                .or(non_blank(stored.logo_url))
                .or(non_blank(stored.logo)),
        }
    }
}

/// Profile read from a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonProfileFile {
    path: PathBuf,
}

impl JsonProfileFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileProvider for JsonProfileFile {
    async fn fetch_profile(&self) -> Result<BusinessProfile> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProjectorError::Profile(format!("{}: {}", self.path.display(), e)))?;
        let stored: StoredProfile = serde_json::from_str(&contents)
            .map_err(|e| ProjectorError::Profile(format!("{}: {}", self.path.display(), e)))?;
        debug!("loaded business profile from {}", self.path.display());
        Ok(stored.into())
    }
}
