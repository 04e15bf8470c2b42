//! The page's address bar, as seen by auth guards and page scripts.

use parking_lot::RwLock;
use url::Url;

use crate::error::AuthError;

/// Current page URL plus the ability to navigate away.
pub trait Location: Send + Sync {
    /// Absolute URL of the current page.
    fn href(&self) -> String;

    /// Navigate to `href` (absolute, or relative to the current page).
    fn assign(&self, href: &str);

    /// Path plus query string (`/account.html?tab=orders`), without fragment.
    fn path_and_query(&self) -> String {
        match Url::parse(&self.href()) {
            Ok(url) => match url.query() {
                Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
                _ => url.path().to_string(),
            },
            Err(_) => "/".to_string(),
        }
    }
}

/// In-process location that records every navigation.
#[derive(Debug)]
pub struct MemoryLocation {
    current: RwLock<Url>,
    navigations: RwLock<Vec<String>>,
}

impl MemoryLocation {
    pub fn new(href: &str) -> Result<Self, AuthError> {
        let url = Url::parse(href)
            .map_err(|e| AuthError::InvalidLocation(format!("{}: {}", href, e)))?;
        Ok(Self {
            current: RwLock::new(url),
            navigations: RwLock::new(Vec::new()),
        })
    }

    /// Navigations in the order they happened, as passed to `assign`.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.read().clone()
    }

    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.read().last().cloned()
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> String {
        self.current.read().to_string()
    }

    fn assign(&self, href: &str) {
        tracing::info!("Navigating to {}", href);
        self.navigations.write().push(href.to_string());

        let mut current = self.current.write();
        match current.join(href) {
            Ok(next) => *current = next,
            Err(e) => tracing::warn!("Cannot resolve navigation target {}: {}", href, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_and_query() {
        let location =
            MemoryLocation::new("https://mixler.ca/account.html?tab=orders#top").unwrap();
        assert_eq!(location.path_and_query(), "/account.html?tab=orders");

        let bare = MemoryLocation::new("https://mixler.ca/events.html?").unwrap();
        assert_eq!(bare.path_and_query(), "/events.html");
    }

    #[test]
    fn test_assign_resolves_relative_and_records() {
        let location = MemoryLocation::new("https://mixler.ca/account.html").unwrap();
        location.assign("/login.html?return=%2Faccount.html");

        assert_eq!(
            location.href(),
            "https://mixler.ca/login.html?return=%2Faccount.html"
        );
        assert_eq!(
            location.navigations(),
            vec!["/login.html?return=%2Faccount.html".to_string()]
        );
    }

    #[test]
    fn test_rejects_relative_start() {
        assert!(matches!(
            MemoryLocation::new("/not-absolute"),
            Err(AuthError::InvalidLocation(_))
        ));
    }
}
