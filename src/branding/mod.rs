//! Branding collaborators for the report masthead
//!
//! Both legs (profile lookup, logo load or fetch) are one-shot async calls. Any
//! failure degrades to a text masthead; report generation never aborts
//! because of branding.

mod logo;
mod profile;

pub use logo::{load_logo, ImageFormat, Logo};
pub use profile::{BusinessProfile, JsonProfileFile, ProfileProvider, StaticProfile};

use log::warn;

/// Business name shown when the profile has none
pub const DEFAULT_BUSINESS_NAME: &str = "YOUR BUSINESS";

/// Subtitle when no logo was configured
pub const NO_LOGO_SUBTITLE: &str = "Professional Analysis";

/// Subtitle when a configured logo could not be loaded
pub const LOGO_FAILED_SUBTITLE: &str = "Analysis Report";

/// What the report header shows in its branding slot
#[derive(Debug, Clone, PartialEq)]
pub enum Masthead {
    Logo { business_name: String, logo: Logo },
    Text { business_name: String, subtitle: String },
}

impl Masthead {
    pub fn business_name(&self) -> &str {
        match self {
            Masthead::Logo { business_name, .. } | Masthead::Text { business_name, .. } => {
                business_name
            }
        }
    }

    fn text(business_name: String, subtitle: &str) -> Self {
        Masthead::Text {
            business_name,
            subtitle: subtitle.to_string(),
        }
    }
}

/// Fetch the profile and its logo, falling back to text on any failure
pub async fn resolve_masthead(provider: &dyn ProfileProvider) -> Masthead {
    let profile = match provider.fetch_profile().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("profile lookup failed, using placeholder branding: {}", e);
            return Masthead::text(DEFAULT_BUSINESS_NAME.to_string(), NO_LOGO_SUBTITLE);
        }
    };

    let business_name = profile.display_name().to_string();
    let Some(reference) = profile.logo.as_deref() else {
        return Masthead::text(business_name, NO_LOGO_SUBTITLE);
    };

    match load_logo(reference).await {
        Ok(logo) => Masthead::Logo {
            business_name,
            logo,
        },
        Err(e) => {
            warn!("{}; falling back to text masthead", e);
            Masthead::text(business_name, LOGO_FAILED_SUBTITLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProjectorError, Result};
    use async_trait::async_trait;

    struct FailingProfile;

    #[async_trait]
    impl ProfileProvider for FailingProfile {
        async fn fetch_profile(&self) -> Result<BusinessProfile> {
            Err(ProjectorError::Profile("not signed in".into()))
        }
    }

    #[tokio::test]
    async fn test_profile_failure_uses_placeholder() {
        let masthead = resolve_masthead(&FailingProfile).await;
        assert_eq!(
            masthead,
            Masthead::Text {
                business_name: "YOUR BUSINESS".into(),
                subtitle: "Professional Analysis".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_no_logo_uses_business_name() {
        let provider = StaticProfile::new(BusinessProfile {
            business_name: Some("Summit Realty".into()),
            logo: None,
        });
        let masthead = resolve_masthead(&provider).await;
        assert_eq!(masthead.business_name(), "Summit Realty");
        assert!(matches!(masthead, Masthead::Text { ref subtitle, .. } if subtitle == NO_LOGO_SUBTITLE));
    }

    #[tokio::test]
    async fn test_broken_logo_falls_back() {
        let provider = StaticProfile::new(BusinessProfile {
            business_name: None,
            logo: Some("/definitely/not/here.png".into()),
        });
        let masthead = resolve_masthead(&provider).await;
        assert_eq!(masthead.business_name(), DEFAULT_BUSINESS_NAME);
        assert!(matches!(masthead, Masthead::Text { ref subtitle, .. } if subtitle == LOGO_FAILED_SUBTITLE));
    }

    #[tokio::test]
    async fn test_unreachable_remote_logo_falls_back() {
        let provider = StaticProfile::new(BusinessProfile {
            business_name: Some("Summit Realty".into()),
            logo: Some(logo::tests::UNREACHABLE_LOGO_URL.into()),
        });
        let masthead = resolve_masthead(&provider).await;
        assert_eq!(
            masthead,
            Masthead::Text {
                business_name: "Summit Realty".into(),
                subtitle: "Analysis Report".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_embedded_logo_is_used() {
        let provider = StaticProfile::new(BusinessProfile {
            business_name: Some("Summit Realty".into()),
            logo: Some(logo::tests::PNG_DATA_URL.into()),
        });
        match resolve_masthead(&provider).await {
            Masthead::Logo { logo, .. } => assert_eq!(logo.format, ImageFormat::Png),
            other => panic!("expected logo masthead, got {:?}", other),
        }
    }
}
