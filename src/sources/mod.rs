//! News sources and their extraction policies
//!
//! Every source supplies the same four things: a name, a fixed listing URL,
//! a politeness delay and an `extract` step that turns the current page into
//! an `ExtractionOutcome`. The crawl loop itself is shared; only the policy
//! differs per site.

pub mod js_scripts;
pub mod npr;
pub mod pbs;
pub mod text;
pub mod upi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::browser::PageHandle;
use crate::crawl_engine::{CrawlDelay, CrawlResult, ExtractionOutcome};

pub use npr::NprPolicy;
pub use pbs::PbsPolicy;
pub use upi::UpiPolicy;

/// Site-specific extraction rules
#[async_trait]
pub trait ExtractionPolicy: Send + Sync {
    /// Key of this source in the multi-source feed
    fn name(&self) -> &str;

    /// Seed page that enumerates the source's articles
    fn listing_url(&self) -> &str;

    /// Delay applied before every navigation
    fn crawl_delay(&self) -> CrawlDelay;

    /// Inspect the page currently loaded in `page`
    ///
    /// `url` is the address that was navigated to; items extracted from the
    /// page carry it. `is_listing` is true when it is this source's listing URL.
    async fn extract(
        &self,
        page: &dyn PageHandle,
        url: &str,
        is_listing: bool,
    ) -> CrawlResult<ExtractionOutcome>;
}

/// Supported news sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsSource {
    Pbs,
    Npr,
    Upi,
}

impl NewsSource {
    pub const ALL: [NewsSource; 3] = [NewsSource::Pbs, NewsSource::Npr, NewsSource::Upi];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pbs => "pbs",
            Self::Npr => "npr",
            Self::Upi => "upi",
        }
    }

    /// Extraction policy for this source
    #[must_use]
    pub fn policy(self) -> Arc<dyn ExtractionPolicy> {
        match self {
            Self::Pbs => Arc::new(PbsPolicy::default()),
            Self::Npr => Arc::new(NprPolicy::default()),
            Self::Upi => Arc::new(UpiPolicy::default()),
        }
    }
}

impl fmt::Display for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pbs" => Ok(Self::Pbs),
            "npr" => Ok(Self::Npr),
            "upi" => Ok(Self::Upi),
            other => Err(format!("Unknown news source: {other}")),
        }
    }
}

/// Policies for the given sources, in the given order
#[must_use]
pub fn policies_for(sources: &[NewsSource]) -> Vec<Arc<dyn ExtractionPolicy>> {
    sources.iter().map(|s| s.policy()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_policies() {
        for source in NewsSource::ALL {
            assert_eq!(source.policy().name(), source.as_str());
            assert_eq!(source.as_str().parse::<NewsSource>().unwrap(), source);
        }
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!("bbc".parse::<NewsSource>().is_err());
    }
}
