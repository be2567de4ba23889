//! HUD snapshot
//!
//! The page owns the layout; the game hands it one `HudState` per frame.

use crate::sim::{BuffKind, GamePhase, GameState, RespawnOffer, session};

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    pub phase: GamePhase,
    pub score: u64,
    pub gold: u64,
    pub high_score: u64,
    /// Whole seconds left per active buff
    pub shield: Option<u32>,
    pub fever: Option<u32>,
    pub immunity: Option<u32>,
    /// 3, 2, 1 while resuming
    pub countdown: Option<u32>,
    /// Offered on the game-over screen
    pub respawn: Option<RespawnOffer>,
    pub fps: Option<u32>,
}

impl HudState {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            gold: state.gold,
            high_score: state.high_score,
            shield: state.buffs.remaining_secs(BuffKind::Shield),
            fever: state.buffs.remaining_secs(BuffKind::Fever),
            immunity: state.buffs.remaining_secs(BuffKind::Immunity),
            countdown: session::countdown_display(state),
            respawn: (state.phase == GamePhase::GameOver).then(|| state.respawn_offer()),
            fps: None,
        }
    }

    /// Caption for a buff badge, e.g. "Shield 4s"
    pub fn buff_label(&self, kind: BuffKind) -> Option<String> {
        let secs = match kind {
            BuffKind::Shield => self.shield,
            BuffKind::Fever => self.fever,
            BuffKind::Immunity => self.immunity,
        }?;
        Some(format!("{} {}s", kind.label(), secs))
    }
}

/// Receives the HUD snapshot
pub trait HudSink {
    fn show(&mut self, hud: &HudState);
}

/// Discards every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl HudSink for NullHud {
    fn show(&mut self, _hud: &HudState) {}
}
