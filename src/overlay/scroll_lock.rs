use tracing::trace;

use crate::host::{Overflow, Scroll};

/// Suppresses scrolling of the root container until dropped.
///
/// Only one lock is expected at a time; nested locks restore in reverse order
/// but are not reference counted.
pub struct ScrollLock<H: Scroll> {
    host: H,
    previous: Overflow,
}

impl<H: Scroll> ScrollLock<H> {
    pub fn lock(host: &H, enabled: bool) -> Option<Self> {
        if !enabled {
            return None;
        }
        let previous = host.root_overflow();
        host.set_root_overflow(Overflow::Hidden);
        trace!(?previous, "root scroll locked");
        Some(Self {
            host: host.clone(),
            previous,
        })
    }

    pub fn previous(&self) -> Overflow {
        self.previous
    }
}

impl<H: Scroll> Drop for ScrollLock<H> {
    fn drop(&mut self) {
        self.host.set_root_overflow(self.previous);
        trace!(restored = ?self.previous, "root scroll unlocked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::scene::Scene;

    #[test]
    fn lock_hides_overflow_and_restores_exact_prior_value() {
        let scene = Scene::new(Viewport::new(80.0, 24.0));
        scene.set_root_overflow(Overflow::Scroll);
        let lock = ScrollLock::lock(&scene, true).expect("enabled");
        assert_eq!(lock.previous(), Overflow::Scroll);
        assert_eq!(scene.root_overflow(), Overflow::Hidden);
        assert!(!scene.scroll_by(1));
        drop(lock);
        assert_eq!(scene.root_overflow(), Overflow::Scroll);
        assert!(scene.scroll_by(1));
    }

    #[test]
    fn disabled_lock_leaves_overflow_alone() {
        let scene = Scene::new(Viewport::new(80.0, 24.0));
        assert!(ScrollLock::lock(&scene, false).is_none());
        assert_eq!(scene.root_overflow(), Overflow::Auto);
    }
}
