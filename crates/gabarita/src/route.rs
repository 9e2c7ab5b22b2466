//! A [`Navigator`] that keeps the current route in a watch channel.

use gabarita_client::Navigator;
use tokio::sync::watch;

/// Tracks the route the host is showing.
///
/// The host reports page changes with [`set_route`](Self::set_route);
/// the client's expired-session redirect goes through
/// [`Navigator::navigate`]. Either way, subscribers see the new route.
#[derive(Debug)]
pub struct RouteTracker {
    route: watch::Sender<String>,
}

impl RouteTracker {
    pub fn new(initial: impl Into<String>) -> Self {
        let (route, _) = watch::channel(initial.into());
        Self { route }
    }

    pub fn current(&self) -> String {
        self.route.borrow().clone()
    }

    /// Records a page change made by the host.
    pub fn set_route(&self, route: &str) {
        self.route.send_replace(route.to_string());
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.route.subscribe()
    }
}

impl Default for RouteTracker {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteTracker {
    fn current_route(&self) -> Option<String> {
        Some(self.current())
    }

    fn navigate(&self, route: &str) {
        tracing::info!(route, "navigating");
        self.set_route(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_updates_current_route() {
        let tracker = RouteTracker::default();
        assert_eq!(tracker.current_route().as_deref(), Some("/"));
        tracker.navigate("/login");
        assert_eq!(tracker.current(), "/login");
    }

    #[tokio::test]
    async fn test_subscribe_sees_route_changes() {
        let tracker = RouteTracker::new("/dashboard");
        let mut rx = tracker.subscribe();
        tracker.set_route("/jogos");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "/jogos");
    }
}
