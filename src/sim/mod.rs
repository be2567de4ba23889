//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each pool)
//! - No rendering or platform dependencies

pub mod buffs;
pub mod collision;
pub mod physics;
pub mod pool;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use buffs::{BuffKind, BuffState, Buffs};
pub use collision::{DeathCause, bonus_hole_hit, collision_stage, ground_hit, obstacle_hit};
pub use pool::{EntityId, EntityPool};
pub use session::RespawnError;
pub use spawn::PeriodicTrigger;
pub use state::{
    BarrierSide, BonusHole, Coin, Decoration, DecorationKind, GameEvent, GamePhase, GameState,
    Item, ItemKind, Obstacle, Oscillation, Player, RespawnOffer,
};
pub use tick::{TickInput, tick};
