//! Session transitions: start, pause, resume, game over, reset and respawn

use std::fmt;

use super::buffs::BuffKind;
use super::collision::DeathCause;
use super::physics;
use super::spawn;
use super::state::{DeathSnapshot, GameEvent, GamePhase, GameState, Player};
use crate::consts::*;

/// Why a paid respawn was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnError {
    /// Not enough gold; `shortfall` is what is missing
    InsufficientGold { shortfall: u64 },
    /// Only a finished run can be respawned
    NotGameOver,
}

impl fmt::Display for RespawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespawnError::InsufficientGold { shortfall } => {
                write!(f, "need {} more gold", shortfall)
            }
            RespawnError::NotGameOver => write!(f, "respawn is only available after game over"),
        }
    }
}

impl std::error::Error for RespawnError {}

/// Begin play from the start screen. Returns false if already started.
pub fn start(state: &mut GameState) -> bool {
    if state.phase != GamePhase::NotStarted {
        return false;
    }
    state.phase = GamePhase::Playing;
    state.obstacle_timer.reset();
    spawn::spawn_obstacle_set(state);
    state.events.push(GameEvent::Started);
    log::info!("Run started (seed {})", state.seed);
    true
}

pub fn pause(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.phase = GamePhase::Paused;
    state.events.push(GameEvent::Paused);
    log::info!("Paused");
    true
}

/// Leave the pause, through the 3-2-1 countdown when `countdown` is set
pub fn resume(state: &mut GameState, countdown: bool) -> bool {
    if state.phase != GamePhase::Paused {
        return false;
    }
    if countdown {
        begin_countdown(state);
    } else {
        state.phase = GamePhase::Playing;
        state.events.push(GameEvent::Resumed);
    }
    true
}

fn begin_countdown(state: &mut GameState) {
    state.phase = GamePhase::Resuming;
    state.countdown = RESUME_COUNTDOWN;
    state.events.push(GameEvent::CountdownStarted);
}

/// Whole seconds left on the countdown (3, 2, 1), if one is running
pub fn countdown_display(state: &GameState) -> Option<u32> {
    (state.phase == GamePhase::Resuming).then(|| state.countdown.ceil().max(1.0) as u32)
}

/// Tick the resume countdown; physics stays frozen until it ends
pub fn countdown_stage(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Resuming {
        return;
    }
    state.countdown -= dt;
    if state.countdown > 0.0 {
        return;
    }
    state.countdown = 0.0;
    state.phase = GamePhase::Playing;
    if state.respawn_pending {
        // A snapshot taken at the waterline would die again on the next tick
        state.respawn_pending = false;
        state.player.pos.y = state.player.pos.y.max(GROUND_Y + RESPAWN_LIFT);
        physics::flap(&mut state.player);
    }
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed");
}

/// End the run: freeze, snapshot for respawn, raise the high score
pub fn game_over(state: &mut GameState, cause: DeathCause) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.death = Some(DeathSnapshot {
        player_y: state.player.pos.y,
        vel_y: state.player.vel_y,
        level_rise_y: state.level_rise_y,
    });

    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
    }
    state.events.push(GameEvent::GameOver {
        score: state.score,
        new_high_score,
        respawn: state.respawn_offer(),
    });
    log::info!(
        "Game over ({:?}): score {}, high score {}{}",
        cause,
        state.score,
        state.high_score,
        if new_high_score { " (new)" } else { "" }
    );
}

/// Start a fresh run. Gold and high score carry over.
pub fn reset(state: &mut GameState) {
    state.obstacles.clear();
    state.coins.clear();
    state.items.clear();
    state.decorations.clear();
    state.buffs.clear();
    state.player = Player::default();
    state.level_rise_y = 0.0;
    state.score = 0;
    state.bonus_score = 0;
    state.fever_coin_timer = 0.0;
    state.countdown = 0.0;
    state.respawn_pending = false;
    state.death = None;
    state.time_ticks = 0;

    spawn::seed_decorations(state);
    state.obstacle_timer.reset();
    state.phase = GamePhase::Playing;
    spawn::spawn_obstacle_set(state);
    state.events.push(GameEvent::Reset);
    log::info!("Run reset (gold {})", state.gold);
}

/// Pay to continue from the death snapshot
pub fn respawn(state: &mut GameState) -> Result<(), RespawnError> {
    if state.phase != GamePhase::GameOver {
        return Err(RespawnError::NotGameOver);
    }
    let Some(snapshot) = state.death else {
        return Err(RespawnError::NotGameOver);
    };
    let offer = state.respawn_offer();
    if !offer.affordable() {
        log::info!("Respawn refused: {}", offer.message());
        return Err(RespawnError::InsufficientGold {
            shortfall: offer.shortfall(),
        });
    }

    state.gold -= offer.cost;
    state.player.pos.y = snapshot.player_y;
    state.player.vel_y = snapshot.vel_y;
    state.level_rise_y = snapshot.level_rise_y;
    state.death = None;
    state.buffs.activate(BuffKind::Immunity);
    state.respawn_pending = true;
    state.events.push(GameEvent::Respawned);
    begin_countdown(state);
    log::info!("Respawned for {} gold ({} left)", offer.cost, state.gold);
    Ok(())
}
