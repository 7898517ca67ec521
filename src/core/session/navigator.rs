//! Navigation seam used by logout.

use std::sync::Arc;

/// Moves the application to another route
pub trait Navigator {
    fn navigate_to(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate_to(&self, path: &str) {
        (**self).navigate_to(path);
    }
}

/// Navigator for contexts without routing (native clients, background tasks)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path, "navigation requested without a router");
    }
}
