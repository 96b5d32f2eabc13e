//! The runtime of one documentation site: its search engine and its navigator.

use crate::config::SiteConfig;
use crate::error::{LoadError, SiteError};
use crate::nav::Navigator;
use crate::search::SearchEngine;

/// Both components, loaded independently.
///
/// A component that failed to load stays unavailable for the life of the site; the
/// other keeps working.
#[derive(Debug)]
pub struct Site {
    search: Result<SearchEngine, LoadError>,
    navigation: Result<Navigator, LoadError>,
}

impl Site {
    /// Loads search and navigation data concurrently.
    pub async fn initialize(config: &SiteConfig) -> Self {
        let (search, navigation) = tokio::join!(
            SearchEngine::load(&config.search),
            Navigator::load(&config.navigation)
        );

        if let Err(e) = &search {
            tracing::error!("Search unavailable: {}", e);
        }
        if let Err(e) = &navigation {
            tracing::error!("Navigation unavailable: {}", e);
        }
        Self { search, navigation }
    }

    pub fn from_parts(
        search: Result<SearchEngine, LoadError>,
        navigation: Result<Navigator, LoadError>,
    ) -> Self {
        Self { search, navigation }
    }

    pub fn search_engine(&self) -> Result<&SearchEngine, SiteError> {
        self.search.as_ref().map_err(|e| SiteError::Unavailable {
            component: "search",
            reason: e.to_string(),
        })
    }

    pub fn navigator(&self) -> Result<&Navigator, SiteError> {
        self.navigation.as_ref().map_err(|e| SiteError::Unavailable {
            component: "navigation",
            reason: e.to_string(),
        })
    }

    /// Whether both components loaded.
    pub fn is_ready(&self) -> bool {
        self.search.is_ok() && self.navigation.is_ok()
    }
}
