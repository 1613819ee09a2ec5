//! Video session page: the composition root of one viewing session.
//!
//! ```text
//! SessionPage
//!   ├── player: Arc<PlayerHandle>          (owned; widget attaches on ready)
//!   ├── conversation: ConversationController
//!   │     └── Weak<dyn PlayerControl> ──▶ player   (pause / play only)
//!   └── transcript_panel: TranscriptPanel  (own fetch, on first expand)
//! ```
//!
//! `mount` builds the tree, `present` runs the fixed loading transition and
//! then primes the controller, `unmount` marks everything in flight stale.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::config::{PageConfig, VoiceConfig};
use crate::conversation::{ConversationController, ConversationDeps};
use crate::player::{embed_url, PlayerHandle};
use crate::session::identity::SessionIdentity;
use crate::session::panel::TranscriptPanel;

/// Top-level view of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageView {
    /// The fixed loading transition.
    Loading,
    /// Player, conversation panel and transcript panel.
    Ready,
}

pub struct SessionPage {
    identity: SessionIdentity,
    player: Arc<PlayerHandle>,
    conversation: Arc<ConversationController>,
    transcript_panel: TranscriptPanel,
    loading_delay: Duration,
    view: PageView,
}

impl SessionPage {
    pub fn mount(
        identity: SessionIdentity,
        page: &PageConfig,
        voice: &VoiceConfig,
        deps: ConversationDeps,
    ) -> Self {
        let player = Arc::new(PlayerHandle::new());
        let weak_player: Weak<PlayerHandle> = Arc::downgrade(&player);

        let transcript_panel =
            TranscriptPanel::new(identity.video_id.clone(), Arc::clone(&deps.transcripts));
        let conversation = Arc::new(ConversationController::new(
            &identity,
            voice,
            deps,
            weak_player,
        ));

        log::info!(
            "session: mounted video {} for {}",
            identity.video_id,
            identity.display_name
        );

        Self {
            identity,
            player,
            conversation,
            transcript_panel,
            loading_delay: page.loading_delay(),
            view: PageView::Loading,
        }
    }

    /// Wait out the loading transition, then prime the grounding transcript.
    pub async fn present(&mut self) {
        if !self.loading_delay.is_zero() {
            tokio::time::sleep(self.loading_delay).await;
        }
        if !self.conversation.is_mounted() {
            return;
        }
        self.view = PageView::Ready;
        self.conversation.prime_transcript().await;
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn view(&self) -> PageView {
        self.view
    }

    pub fn embed_url(&self) -> String {
        embed_url(&self.identity.video_id)
    }

    /// The owned player handle; the embed attaches through
    /// [`PlayerHandle::on_ready`].
    pub fn player(&self) -> &Arc<PlayerHandle> {
        &self.player
    }

    pub fn conversation(&self) -> &Arc<ConversationController> {
        &self.conversation
    }

    pub fn transcript_panel(&self) -> &TranscriptPanel {
        &self.transcript_panel
    }

    pub fn transcript_panel_mut(&mut self) -> &mut TranscriptPanel {
        &mut self.transcript_panel
    }

    /// Navigate away: late results are discarded from here on.
    pub fn unmount(&self) {
        self.conversation.unmount();
        log::info!("session: unmounted video {}", self.identity.video_id);
    }
}
