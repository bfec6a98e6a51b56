//! Last-observed-URL tracking for client-side navigation detection.

/// Tracks the last observed document URL and reports changes.
///
/// The first observation primes the tracker without reporting a change, so
/// installing a watcher on an already-loaded page never triggers a rescan by
/// itself.
#[derive(Debug, Clone, Default)]
pub struct UrlTracker {
    last: Option<String>,
}

impl UrlTracker {
    /// Tracker with no observed URL; the next observation primes it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker primed with a known URL, as when capturing `location.href`
    /// at install time.
    pub fn primed(href: impl Into<String>) -> Self {
        Self {
            last: Some(href.into()),
        }
    }

    /// Record the current URL. Returns `true` when it differs from the last
    /// observed one.
    pub fn observe(&mut self, href: &str) -> bool {
        let changed = match self.last.as_deref() {
            Some(previous) => previous != href,
            None => false,
        };
        if self.last.as_deref() != Some(href) {
            self.last = Some(href.to_string());
        }
        changed
    }

    /// Last observed URL, if any.
    pub fn current(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_primes() {
        let mut tracker = UrlTracker::new();
        assert!(!tracker.observe("https://example.test/video/1"));
        assert_eq!(tracker.current(), Some("https://example.test/video/1"));
    }

    #[test]
    fn test_same_url_never_fires() {
        let mut tracker = UrlTracker::primed("https://example.test/video/1");
        assert!(!tracker.observe("https://example.test/video/1"));
        assert!(!tracker.observe("https://example.test/video/1"));
    }

    #[test]
    fn test_each_change_fires_once() {
        let mut tracker = UrlTracker::primed("https://example.test/video/1");
        assert!(tracker.observe("https://example.test/video/2"));
        assert!(!tracker.observe("https://example.test/video/2"));
        assert!(tracker.observe("https://example.test/video/3"));
        assert!(tracker.observe("https://example.test/video/1"));
    }

    #[test]
    fn test_primed_matches_install_capture() {
        let tracker = UrlTracker::primed("https://example.test/");
        assert_eq!(tracker.current(), Some("https://example.test/"));
    }
}
