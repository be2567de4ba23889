//! Game state and core simulation types
//!
//! `GameState` is the single aggregate that owns the player, every entity pool,
//! the buff timers, the spawn scheduler and the session bookkeeping.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::buffs::{BuffKind, Buffs};
use super::pool::{EntityId, EntityPool};
use super::spawn::{DecorationBand, PeriodicTrigger};
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen, waiting for the first flap
    NotStarted,
    /// Active gameplay
    Playing,
    /// Frozen by the player
    Paused,
    /// 3-2-1 countdown before play continues (input ignored)
    Resuming,
    /// Run ended, waiting for reset or respawn
    GameOver,
}

/// The shark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec3,
    pub vel_y: f32,
    /// Nose pitch (cosmetic only)
    pub tilt: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, PLAY_HEIGHT / 2.0, 0.0),
            vel_y: 0.0,
            tilt: 0.0,
        }
    }
}

/// Vertical oscillation of a moving obstacle's gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub amplitude: f32,
    /// Angular speed (radians/s)
    pub speed: f32,
    pub phase: f32,
    /// Seconds since spawn
    pub time: f32,
}

impl Oscillation {
    pub fn offset(&self) -> f32 {
        self.amplitude * (self.phase + self.speed * self.time).sin()
    }
}

/// Which barrier of an obstacle a bonus hole is cut into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierSide {
    Top,
    Bottom,
}

/// Secondary passage through a barrier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusHole {
    pub side: BarrierSide,
    /// Centre height relative to the obstacle base
    pub local_y: f32,
    pub radius: f32,
    pub collected: bool,
}

/// A pair of barriers with a gap between them
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    /// Follows the level scroll offset
    pub base_y: f32,
    /// Gap centre relative to `base_y` (before oscillation)
    pub gap_y: f32,
    pub gap_height: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub oscillation: Option<Oscillation>,
    pub hole: Option<BonusHole>,
}

impl Obstacle {
    /// A stationary obstacle with default dimensions
    pub fn new(x: f32, base_y: f32, gap_y: f32) -> Self {
        Self {
            x,
            base_y,
            gap_y,
            gap_height: GAP_HEIGHT,
            width: OBSTACLE_WIDTH,
            depth: OBSTACLE_DEPTH,
            height: OBSTACLE_HEIGHT,
            oscillation: None,
            hole: None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.oscillation.is_some()
    }

    fn sway(&self) -> f32 {
        self.oscillation.map(|o| o.offset()).unwrap_or(0.0)
    }

    /// Gap centre relative to the base, including oscillation
    pub fn current_gap_y(&self) -> f32 {
        self.gap_y + self.sway()
    }

    /// Gap centre in world space
    pub fn gap_center(&self) -> f32 {
        self.base_y + self.current_gap_y()
    }

    /// World-space (bottom, top) of the gap
    pub fn gap_bounds(&self) -> (f32, f32) {
        let c = self.gap_center();
        (c - self.gap_height / 2.0, c + self.gap_height / 2.0)
    }

    /// World-space centre of the bonus hole, if any
    pub fn hole_center(&self) -> Option<Vec3> {
        self.hole
            .map(|h| Vec3::new(self.x, self.base_y + h.local_y + self.sway(), 0.0))
    }

    /// Barrier opacity: fades once behind the player, ghosted while shielded
    pub fn opacity(&self, player_x: f32, shielded: bool) -> f32 {
        if shielded {
            return 0.3;
        }
        let dx = self.x - player_x;
        if dx < -0.5 {
            (1.0 + (dx + 0.5) / 2.0).max(0.0)
        } else {
            1.0
        }
    }
}

/// A gold coin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub pos: Vec3,
    pub collected: bool,
    /// Spin angle (cosmetic)
    pub spin: f32,
    /// Obstacle whose gap centre this coin tracks
    pub anchor: Option<EntityId>,
}

impl Coin {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            collected: false,
            spin: 0.0,
            anchor: None,
        }
    }

    /// A coin riding in an obstacle's gap
    pub fn in_gap(pos: Vec3, obstacle: EntityId) -> Self {
        Self {
            anchor: Some(obstacle),
            ..Self::new(pos)
        }
    }
}

/// Power-up pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Shield,
    Fever,
}

impl ItemKind {
    pub fn buff(self) -> BuffKind {
        match self {
            ItemKind::Shield => BuffKind::Shield,
            ItemKind::Fever => BuffKind::Fever,
        }
    }
}

/// A floating power-up pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec3,
    /// Bob baseline (follows the level scroll)
    pub base_y: f32,
    /// Seconds alive, drives the bob
    pub time: f32,
    pub collected: bool,
    /// Seconds since collection (drives the pop animation)
    pub collect_time: f32,
    pub spin: f32,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec3) -> Self {
        Self {
            kind,
            pos,
            base_y: pos.y,
            time: 0.0,
            collected: false,
            collect_time: 0.0,
            spin: 0.0,
        }
    }

    /// Progress of the collection animation in [0, 1]
    pub fn collect_progress(&self) -> f32 {
        if self.collected {
            (self.collect_time / ITEM_COLLECT_ANIM).min(1.0)
        } else {
            0.0
        }
    }

    /// Scale: 1 while floating, growing to 3 while popping
    pub fn scale(&self) -> f32 {
        1.0 + self.collect_progress() * 2.0
    }

    pub fn opacity(&self) -> f32 {
        1.0 - self.collect_progress()
    }
}

/// Scenery kinds on the sea surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Rock,
    TropicalIsland,
    BigIsland,
    VolcanoIsland,
}

impl DecorationKind {
    pub fn is_island(self) -> bool {
        !matches!(self, DecorationKind::Rock)
    }
}

/// A rock or island drifting past
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub pos: Vec3,
    pub size: f32,
    /// Random yaw (cosmetic)
    pub yaw: f32,
}

/// Player state captured at the moment of death
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathSnapshot {
    pub player_y: f32,
    pub vel_y: f32,
    pub level_rise_y: f32,
}

/// What the game-over screen can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnOffer {
    pub cost: u64,
    pub gold: u64,
}

impl RespawnOffer {
    pub fn new(gold: u64) -> Self {
        Self {
            cost: RESPAWN_COST,
            gold,
        }
    }

    pub fn affordable(&self) -> bool {
        self.gold >= self.cost
    }

    pub fn shortfall(&self) -> u64 {
        self.cost.saturating_sub(self.gold)
    }

    /// Button caption
    pub fn message(&self) -> String {
        if self.affordable() {
            format!("Respawn ({} gold)", self.cost)
        } else {
            format!("need {} more gold", self.shortfall())
        }
    }
}

/// Notable things that happened during a tick (drained by the driver)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Flapped,
    CoinCollected { gold: u64 },
    ItemCollected { kind: ItemKind },
    BonusHole { bonus: u64 },
    BuffExpired { kind: BuffKind },
    Paused,
    CountdownStarted,
    Resumed,
    GameOver {
        score: u64,
        new_high_score: bool,
        respawn: RespawnOffer,
    },
    Respawned,
    Reset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
    pub player: Player,
    /// Cumulative upward scroll of the level
    pub level_rise_y: f32,
    pub score: u64,
    /// Score earned outside of climbing (bonus holes)
    pub bonus_score: u64,
    /// Persistent currency (survives resets)
    pub gold: u64,
    pub high_score: u64,
    pub obstacles: EntityPool<Obstacle>,
    pub coins: EntityPool<Coin>,
    pub items: EntityPool<Item>,
    pub decorations: EntityPool<Decoration>,
    pub buffs: Buffs,
    pub obstacle_timer: PeriodicTrigger,
    /// Seconds accumulated toward the next fever coin
    pub fever_coin_timer: f32,
    pub rock_band: DecorationBand,
    pub island_band: DecorationBand,
    /// Seconds left in the resume countdown
    pub countdown: f32,
    /// The running countdown follows a respawn
    pub respawn_pending: bool,
    pub death: Option<DeathSnapshot>,
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new session with the given seed and persisted economy values
    pub fn new(seed: u64, gold: u64, high_score: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            time_ticks: 0,
            player: Player::default(),
            level_rise_y: 0.0,
            score: 0,
            bonus_score: 0,
            gold,
            high_score,
            obstacles: EntityPool::new(),
            coins: EntityPool::new(),
            items: EntityPool::new(),
            decorations: EntityPool::new(),
            buffs: Buffs::default(),
            obstacle_timer: PeriodicTrigger::new(OBSTACLE_INTERVAL),
            fever_coin_timer: 0.0,
            rock_band: DecorationBand::rocks(),
            island_band: DecorationBand::islands(),
            countdown: 0.0,
            respawn_pending: false,
            death: None,
            events: Vec::new(),
            next_id: 1,
        };

        super::spawn::seed_decorations(&mut state);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Respawn offer at the current gold balance
    pub fn respawn_offer(&self) -> RespawnOffer {
        RespawnOffer::new(self.gold)
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Compact every pool after a tick's stages have marked removals
    pub fn compact_pools(&mut self) {
        self.obstacles.compact();
        self.coins.compact();
        self.items.compact();
        self.decorations.compact();
    }
}
