//! RenderSurface trait — the seam to the display host.
//!
//! The widget runtime never renders anything itself. It mutates its display
//! state and then signals the host through this trait; the host re-reads the
//! current view and redraws, applying whatever transition the animation delay
//! allows (a browser fades, a terminal just reprints).

use std::time::Duration;

/// A display host that consumes refresh signals.
pub trait RenderSurface: Send + Sync {
    /// Notify the host that the display state changed.
    ///
    /// `animation_delay` is the configured transition length; hosts that
    /// cannot animate are free to ignore it.
    fn refresh(&self, animation_delay: Duration);
}

/// A surface that ignores refresh signals. Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn refresh(&self, _animation_delay: Duration) {}
}
