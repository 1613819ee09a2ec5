//! The pause/play capability shared between the session page and the
//! conversation controller.
//!
//! The page owns a [`PlayerHandle`] (`Arc`); the controller keeps only a
//! `Weak<dyn PlayerControl>`.  Until the embed widget reports ready, pause
//! and play are silently ignored.

use std::sync::{Arc, Mutex};

/// The external video embed.  Consumed, never reimplemented.
pub trait VideoWidget: Send + Sync {
    fn play_video(&self);
    fn pause_video(&self);
}

/// The only operations the conversation controller may perform on the
/// player.  It never queries player state.
pub trait PlayerControl: Send + Sync {
    fn pause(&self);
    fn play(&self);
}

/// Owning control handle around a widget that may not be ready yet.
#[derive(Default)]
pub struct PlayerHandle {
    widget: Mutex<Option<Arc<dyn VideoWidget>>>,
}

impl PlayerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The widget's "ready" notification.
    pub fn on_ready(&self, widget: Arc<dyn VideoWidget>) {
        log::debug!("player: widget ready");
        if let Ok(mut slot) = self.widget.lock() {
            *slot = Some(widget);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.widget.lock().map(|w| w.is_some()).unwrap_or(false)
    }

    fn current(&self) -> Option<Arc<dyn VideoWidget>> {
        self.widget.lock().ok().and_then(|w| w.clone())
    }
}

impl PlayerControl for PlayerHandle {
    fn pause(&self) {
        match self.current() {
            Some(widget) => widget.pause_video(),
            None => log::debug!("player: pause ignored, widget not ready"),
        }
    }

    fn play(&self) {
        match self.current() {
            Some(widget) => widget.play_video(),
            None => log::debug!("player: play ignored, widget not ready"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingWidget  (test-only)
// ---------------------------------------------------------------------------

/// Test widget appending `"pause"` / `"play"` to a shared journal.
#[cfg(test)]
pub struct RecordingWidget {
    pub journal: Arc<Mutex<Vec<&'static str>>>,
}

#[cfg(test)]
impl RecordingWidget {
    pub fn new(journal: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self { journal }
    }
}

#[cfg(test)]
impl VideoWidget for RecordingWidget {
    fn play_video(&self) {
        self.journal.lock().unwrap().push("play");
    }

    fn pause_video(&self) {
        self.journal.lock().unwrap().push("pause");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Weak;

    #[test]
    fn ignores_commands_before_ready() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let handle = PlayerHandle::new();

        handle.pause();
        handle.play();
        assert!(!handle.is_ready());

        handle.on_ready(Arc::new(RecordingWidget::new(journal.clone())));
        assert!(handle.is_ready());
        handle.pause();
        handle.play();

        assert_eq!(*journal.lock().unwrap(), vec!["pause", "play"]);
    }

    #[test]
    fn weak_borrow_does_not_keep_handle_alive() {
        let handle = Arc::new(PlayerHandle::new());
        let weak: Weak<PlayerHandle> = Arc::downgrade(&handle);
        let borrowed: Weak<dyn PlayerControl> = weak;

        assert!(borrowed.upgrade().is_some());
        drop(handle);
        assert!(borrowed.upgrade().is_none());
    }
}
