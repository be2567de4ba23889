//! Timed power-up buffs
//!
//! Each buff is independent: `Inactive -> Active { remaining } -> Inactive`.

use crate::consts::{FEVER_DURATION, IMMUNITY_DURATION, SHIELD_DURATION};

/// The three timed buffs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuffKind {
    /// Picked up as an item; suppresses obstacle collisions
    Shield,
    /// Picked up as an item; rains extra coins
    Fever,
    /// Granted by bonus holes and respawns; suppresses obstacle collisions
    Immunity,
}

impl BuffKind {
    pub const ALL: [BuffKind; 3] = [BuffKind::Shield, BuffKind::Fever, BuffKind::Immunity];

    pub fn duration(self) -> f32 {
        match self {
            BuffKind::Shield => SHIELD_DURATION,
            BuffKind::Fever => FEVER_DURATION,
            BuffKind::Immunity => IMMUNITY_DURATION,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuffKind::Shield => "Shield",
            BuffKind::Fever => "Coin Fever",
            BuffKind::Immunity => "Immunity",
        }
    }
}

/// State of a single buff
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BuffState {
    #[default]
    Inactive,
    Active { remaining: f32 },
}

impl BuffState {
    pub fn is_active(&self) -> bool {
        matches!(self, BuffState::Active { .. })
    }

    /// Count down; returns true on the tick the buff runs out
    fn advance(&mut self, dt: f32) -> bool {
        if let BuffState::Active { remaining } = self {
            *remaining -= dt;
            if *remaining <= 0.0 {
                *self = BuffState::Inactive;
                return true;
            }
        }
        false
    }
}

/// All buff timers of a session
#[derive(Debug, Clone, Default)]
pub struct Buffs {
    pub shield: BuffState,
    pub fever: BuffState,
    pub immunity: BuffState,
}

impl Buffs {
    fn slot_mut(&mut self, kind: BuffKind) -> &mut BuffState {
        match kind {
            BuffKind::Shield => &mut self.shield,
            BuffKind::Fever => &mut self.fever,
            BuffKind::Immunity => &mut self.immunity,
        }
    }

    pub fn get(&self, kind: BuffKind) -> BuffState {
        match kind {
            BuffKind::Shield => self.shield,
            BuffKind::Fever => self.fever,
            BuffKind::Immunity => self.immunity,
        }
    }

    /// Start (or refresh) a buff at its full duration
    pub fn activate(&mut self, kind: BuffKind) {
        *self.slot_mut(kind) = BuffState::Active {
            remaining: kind.duration(),
        };
    }

    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.get(kind).is_active()
    }

    /// Obstacle-body collisions are ignored while shielded or immune
    pub fn suppresses_obstacles(&self) -> bool {
        self.shield.is_active() || self.immunity.is_active()
    }

    /// Remaining whole seconds for the HUD (ceiling-rounded)
    pub fn remaining_secs(&self, kind: BuffKind) -> Option<u32> {
        match self.get(kind) {
            BuffState::Active { remaining } => Some(remaining.ceil().max(0.0) as u32),
            BuffState::Inactive => None,
        }
    }

    /// Advance all timers, returning the buffs that expired this step
    pub fn advance(&mut self, dt: f32) -> Vec<BuffKind> {
        BuffKind::ALL
            .into_iter()
            .filter(|&kind| self.slot_mut(kind).advance(dt))
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
