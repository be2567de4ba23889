//! Procedural spawning and world scroll
//!
//! Obstacles arrive on a fixed cadence with a minimum spacing, each carrying a
//! coin in its gap and sometimes a power-up. Scenery is kept in a band ahead of
//! the player and pruned behind it so the live count never grows with time.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use super::buffs::BuffKind;
use super::pool::EntityId;
use super::state::{
    BarrierSide, BonusHole, Coin, Decoration, DecorationKind, GameState, Item, ItemKind, Obstacle,
    Oscillation,
};
use crate::consts::*;

/// Deterministic repeating timer driven by the tick `dt`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTrigger {
    pub interval: f32,
    elapsed: f32,
}

impl PeriodicTrigger {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`, returning how many times the trigger fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Frontier of one decoration category; everything behind it is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationBand {
    pub frontier: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub islands: bool,
}

impl DecorationBand {
    pub fn rocks() -> Self {
        Self {
            frontier: DECOR_SEED_X,
            min_gap: 1.0,
            max_gap: 3.0,
            islands: false,
        }
    }

    pub fn islands() -> Self {
        Self {
            frontier: DECOR_SEED_X,
            min_gap: 6.0,
            max_gap: 14.0,
            islands: true,
        }
    }

    pub fn reset(&mut self) {
        self.frontier = DECOR_SEED_X;
    }
}

/// Valid range for a gap centre (relative to the obstacle base)
pub fn gap_range(gap_height: f32) -> (f32, f32) {
    (
        gap_height / 2.0 + GAP_EDGE_MARGIN,
        PLAY_HEIGHT - gap_height / 2.0 - GAP_EDGE_MARGIN,
    )
}

/// Room for a bonus hole centre in one barrier, or None if the barrier is too short
pub fn hole_range(obs: &Obstacle, side: BarrierSide) -> Option<(f32, f32)> {
    let r = BONUS_HOLE_RADIUS;
    let (lo, hi) = match side {
        BarrierSide::Top => (
            obs.gap_y + obs.gap_height / 2.0 + BONUS_HOLE_CLEARANCE + r,
            obs.height.min(PLAY_HEIGHT + 1.0) - r,
        ),
        BarrierSide::Bottom => (
            GROUND_Y + r,
            obs.gap_y - obs.gap_height / 2.0 - BONUS_HOLE_CLEARANCE - r,
        ),
    };
    if hi - lo <= 0.0 { None } else { Some((lo, hi)) }
}

/// Cut a bonus hole into the preferred barrier, falling back to the other one
pub fn place_bonus_hole(
    obs: &Obstacle,
    prefer: BarrierSide,
    rng: &mut impl Rng,
) -> Option<BonusHole> {
    let other = match prefer {
        BarrierSide::Top => BarrierSide::Bottom,
        BarrierSide::Bottom => BarrierSide::Top,
    };
    let (side, (lo, hi)) = [prefer, other]
        .into_iter()
        .find_map(|side| hole_range(obs, side).map(|range| (side, range)))?;

    Some(BonusHole {
        side,
        local_y: lo + (hi - lo) * rng.random::<f32>(),
        radius: BONUS_HOLE_RADIUS,
        collected: false,
    })
}

/// Spawn an obstacle at the right edge, unless the previous one is still too close
pub fn spawn_obstacle(state: &mut GameState) -> Option<EntityId> {
    if let Some((_, last)) = state.obstacles.newest() {
        if last.x > OBSTACLE_SPAWN_X - OBSTACLE_SPACING {
            log::debug!("Obstacle spawn blocked: previous at x={:.2}", last.x);
            return None;
        }
    }

    let (min_gap, max_gap) = gap_range(GAP_HEIGHT);
    let gap_y = min_gap + (max_gap - min_gap) * state.rng.random::<f32>();
    let mut obs = Obstacle::new(OBSTACLE_SPAWN_X, state.level_rise_y, gap_y);

    if state.rng.random_bool(MOVING_CHANCE) {
        // Keep the swinging gap inside the valid range
        let margin = (gap_y - min_gap).min(max_gap - gap_y);
        let amplitude = state.rng.random_range(0.4..0.9f32).min(margin);
        let speed = state.rng.random_range(1.5..2.5f32);
        let phase = state.rng.random_range(0.0..TAU);
        if amplitude > 0.0 {
            obs.oscillation = Some(Oscillation {
                amplitude,
                speed,
                phase,
                time: 0.0,
            });
        }
    } else if state.rng.random_bool(BONUS_HOLE_CHANCE) {
        let prefer = if state.rng.random_bool(0.5) {
            BarrierSide::Top
        } else {
            BarrierSide::Bottom
        };
        obs.hole = place_bonus_hole(&obs, prefer, &mut state.rng);
        if obs.hole.is_none() {
            log::debug!("No room for a bonus hole at gap_y={:.2}", gap_y);
        }
    }

    let id = state.next_entity_id();
    log::debug!(
        "Spawned obstacle {} gap_y={:.2} moving={} hole={}",
        id,
        gap_y,
        obs.is_moving(),
        obs.hole.is_some()
    );
    state.obstacles.insert(id, obs);
    Some(id)
}

pub fn spawn_coin(state: &mut GameState, pos: Vec3) -> EntityId {
    let id = state.next_entity_id();
    state.coins.insert(id, Coin::new(pos));
    id
}

pub fn spawn_item(state: &mut GameState, kind: ItemKind, pos: Vec3) -> EntityId {
    let id = state.next_entity_id();
    state.items.insert(id, Item::new(kind, pos));
    id
}

/// Obstacle plus its gap coin and the occasional power-up
pub fn spawn_obstacle_set(state: &mut GameState) -> bool {
    let Some(id) = spawn_obstacle(state) else {
        return false;
    };
    let Some(obs) = state.obstacles.get(id) else {
        return false;
    };
    let coin_pos = Vec3::new(obs.x, obs.gap_center(), COIN_Z);
    let coin_id = state.next_entity_id();
    state.coins.insert(coin_id, Coin::in_gap(coin_pos, id));

    if state.rng.random_bool(ITEM_CHANCE) {
        let kind = if state.rng.random_bool(0.5) {
            ItemKind::Shield
        } else {
            ItemKind::Fever
        };
        let dy = state.rng.random_range(-0.75..0.75f32);
        let pos = Vec3::new(coin_pos.x + 1.5, coin_pos.y + dy, COIN_Z);
        spawn_item(state, kind, pos);
        log::debug!("Spawned {:?} item", kind);
    }
    true
}

/// Extra coins near obstacles ahead of the player while fever runs
pub fn fever_coins(state: &mut GameState, dt: f32) {
    if !state.buffs.is_active(BuffKind::Fever) {
        return;
    }
    state.fever_coin_timer += dt;
    if state.fever_coin_timer <= FEVER_COIN_INTERVAL || state.coins.iter().count() >= MAX_COINS {
        return;
    }
    state.fever_coin_timer = 0.0;

    let player_x = state.player.pos.x;
    let targets: Vec<(f32, f32, f32)> = state
        .obstacles
        .iter()
        .filter(|(_, o)| o.x > player_x)
        .map(|(_, o)| (o.x, o.gap_center(), o.gap_height))
        .collect();
    if targets.is_empty() {
        return;
    }

    let (x, center, gap_height) = targets[state.rng.random_range(0..targets.len())];
    let pos = Vec3::new(
        x + state.rng.random_range(-0.75..0.75f32),
        center + (state.rng.random::<f32>() - 0.5) * gap_height * 0.6,
        state.rng.random_range(-0.75..0.75f32),
    );
    spawn_coin(state, pos);
}

fn random_side(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

fn make_decoration(band: &DecorationBand, x: f32, rng: &mut impl Rng) -> Decoration {
    let yaw = rng.random_range(0.0..TAU);
    if !band.islands {
        let size = 0.3 + rng.random::<f32>() * 0.5;
        let z = random_side(rng) * (3.0 + rng.random::<f32>() * 7.0);
        return Decoration {
            kind: DecorationKind::Rock,
            pos: Vec3::new(x, size * 0.3, z),
            size,
            yaw,
        };
    }

    let roll = rng.random::<f32>();
    let (kind, size) = if roll < 0.33 {
        (DecorationKind::TropicalIsland, 2.0 + rng.random::<f32>() * 2.0)
    } else if roll < 0.66 {
        (DecorationKind::BigIsland, 4.0 + rng.random::<f32>() * 3.0)
    } else {
        (DecorationKind::VolcanoIsland, 3.0 + rng.random::<f32>() * 2.0)
    };
    let z = random_side(rng) * (8.0 + rng.random::<f32>() * 12.0);
    Decoration {
        kind,
        pos: Vec3::new(x, 0.0, z),
        size,
        yaw,
    }
}

/// Top up scenery until each band reaches the look-ahead distance
pub fn fill_decorations(state: &mut GameState) {
    for islands in [false, true] {
        loop {
            let band = if islands { state.island_band } else { state.rock_band };
            if band.frontier >= DECOR_AHEAD_X {
                break;
            }
            let x = band.frontier + state.rng.random_range(band.min_gap..band.max_gap);
            let deco = make_decoration(&band, x, &mut state.rng);
            let id = state.next_entity_id();
            state.decorations.insert(id, deco);
            if islands {
                state.island_band.frontier = x;
            } else {
                state.rock_band.frontier = x;
            }
        }
    }
}

/// Initial scenery for a fresh session
pub fn seed_decorations(state: &mut GameState) {
    state.rock_band.reset();
    state.island_band.reset();
    fill_decorations(state);
    log::debug!("Seeded {} decorations", state.decorations.len());
}

/// Scroll every entity left, animate pickups and retire what fell off-screen
pub fn advance_world(state: &mut GameState, dt: f32) {
    let dx = SCROLL_SPEED * dt;

    for (_, obs) in state.obstacles.iter_mut() {
        obs.x -= dx;
        if let Some(osc) = obs.oscillation.as_mut() {
            osc.time += dt;
        }
    }
    state.obstacles.retire_where(|o| o.x < OBSTACLE_CUTOFF_X);

    for (_, coin) in state.coins.iter_mut() {
        coin.pos.x -= dx;
        if !coin.collected {
            coin.spin += dt * 2.0;
        }
        // Gap coins follow a swinging gap
        if let Some(obs) = coin.anchor.and_then(|id| state.obstacles.get(id)) {
            coin.pos.y = obs.gap_center();
        }
    }
    state.coins.retire_where(|c| c.pos.x < OBSTACLE_CUTOFF_X);

    for (_, item) in state.items.iter_mut() {
        item.pos.x -= dx;
        if item.collected {
            item.collect_time += dt;
        } else {
            item.time += dt;
            item.pos.y = item.base_y + (item.time * 3.0).sin() * 0.3;
            item.spin += dt * 2.0;
        }
    }
    state
        .items
        .retire_where(|i| i.pos.x < OBSTACLE_CUTOFF_X || i.collect_progress() >= 1.0);

    for (_, deco) in state.decorations.iter_mut() {
        deco.pos.x -= dx;
    }
    state.decorations.retire_where(|d| d.pos.x < DECOR_CUTOFF_X);
    state.rock_band.frontier -= dx;
    state.island_band.frontier -= dx;
    fill_decorations(state);
}

/// Spawn stage: obstacle cadence and fever coins
pub fn spawn_stage(state: &mut GameState, dt: f32) {
    let fires = state.obstacle_timer.advance(dt);
    for _ in 0..fires {
        spawn_obstacle_set(state);
    }
    fever_coins(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, 0, 0);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_periodic_trigger() {
        let mut t = PeriodicTrigger::new(1.8);
        assert_eq!(t.advance(1.0), 0);
        assert_eq!(t.advance(1.0), 1);
        assert_eq!(t.advance(4.0), 2);
        t.reset();
        assert_eq!(t.advance(1.7), 0);
    }

    #[test]
    fn test_spawn_blocked_by_spacing() {
        let mut state = playing(1);
        assert!(spawn_obstacle(&mut state).is_some());
        // Previous obstacle still at the spawn line
        assert!(spawn_obstacle(&mut state).is_none());

        for (_, obs) in state.obstacles.iter_mut() {
            obs.x = OBSTACLE_SPAWN_X - OBSTACLE_SPACING;
        }
        assert!(spawn_obstacle(&mut state).is_some());
    }

    #[test]
    fn test_obstacle_set_has_gap_coin() {
        let mut state = playing(3);
        assert!(spawn_obstacle_set(&mut state));
        let (_, obs) = state.obstacles.newest().unwrap();
        let (_, coin) = state.coins.iter().next().unwrap();
        assert_eq!(coin.pos.x, obs.x);
        assert!((coin.pos.y - obs.gap_center()).abs() < 1e-6);
        assert_eq!(coin.pos.z, COIN_Z);
    }

    #[test]
    fn test_gap_coin_follows_moving_gap() {
        let mut state = playing(3);
        let mut obs = Obstacle::new(OBSTACLE_SPAWN_X, 0.0, 3.0);
        obs.oscillation = Some(Oscillation {
            amplitude: 0.9,
            speed: 2.0,
            phase: 0.0,
            time: 0.0,
        });
        state.obstacles.insert(10, obs);
        state.coins.insert(11, Coin::in_gap(Vec3::new(OBSTACLE_SPAWN_X, 3.0, COIN_Z), 10));

        let mut max_offset: f32 = 0.0;
        for _ in 0..(1.0 / SIM_DT) as usize {
            advance_world(&mut state, SIM_DT);
            let obs = state.obstacles.get(10).unwrap();
            let coin = state.coins.get(11).unwrap();
            assert!((coin.pos.y - obs.gap_center()).abs() < 1e-5);
            assert_eq!(coin.pos.x, obs.x);
            max_offset = max_offset.max((coin.pos.y - 3.0).abs());
        }
        // The gap swung past the collision margin; the coin went with it
        assert!(max_offset > GAP_HEIGHT / 2.0 - COLLISION_RADIUS);
    }

    #[test]
    fn test_hole_range_skips_short_barrier() {
        let (min_gap, max_gap) = gap_range(GAP_HEIGHT);
        // Gap at the bottom edge leaves no bottom material
        let low = Obstacle::new(0.0, 0.0, min_gap);
        assert!(hole_range(&low, BarrierSide::Bottom).is_none());
        assert!(hole_range(&low, BarrierSide::Top).is_some());

        // Gap pushed past the top edge leaves no top material (within the play area)
        let high = Obstacle::new(0.0, 0.0, max_gap + 0.1);
        assert!(hole_range(&high, BarrierSide::Top).is_none());

        let mut rng = Pcg32::seed_from_u64(5);
        let hole = place_bonus_hole(&high, BarrierSide::Top, &mut rng).unwrap();
        assert_eq!(hole.side, BarrierSide::Bottom);
        let (bottom, _) = high.gap_bounds();
        assert!(hole.local_y + hole.radius + BONUS_HOLE_CLEARANCE <= bottom + 1e-5);
    }

    #[test]
    fn test_world_scroll_retires_offscreen() {
        let mut state = playing(4);
        spawn_obstacle_set(&mut state);
        for _ in 0..(10.0 / SIM_DT) as usize {
            advance_world(&mut state, SIM_DT);
            state.compact_pools();
        }
        // 24 units at 3.6 u/s takes ~6.7s
        assert!(state.obstacles.is_empty());
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_collected_item_retires_after_animation() {
        let mut state = playing(5);
        let id = spawn_item(&mut state, ItemKind::Fever, Vec3::new(5.0, 3.0, 0.0));
        state.items.get_mut(id).unwrap().collected = true;
        for _ in 0..((ITEM_COLLECT_ANIM / SIM_DT) as usize + 2) {
            advance_world(&mut state, SIM_DT);
            state.compact_pools();
        }
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_decorations_stay_bounded() {
        let mut state = playing(6);
        let initial = state.decorations.len();
        let mut peak = 0;
        for _ in 0..(120.0 / SIM_DT) as usize {
            advance_world(&mut state, SIM_DT);
            state.compact_pools();
            peak = peak.max(state.decorations.len());
        }
        // Band width / smallest gap for each category
        let cap = ((DECOR_AHEAD_X - DECOR_CUTOFF_X) / 1.0 + (DECOR_AHEAD_X - DECOR_CUTOFF_X) / 6.0)
            as usize
            + 2;
        assert!(initial > 0);
        assert!(peak <= cap, "peak {} > cap {}", peak, cap);
        assert!(state.decorations.iter().all(|(_, d)| d.pos.x >= DECOR_CUTOFF_X));
    }

    #[test]
    fn test_fever_coin_burst() {
        let mut state = playing(8);
        state.obstacles.insert(900, Obstacle::new(5.0, 0.0, 3.0));
        state.buffs.activate(BuffKind::Fever);

        let mut ticks = 0;
        while ticks < (8.5 / SIM_DT) as usize {
            fever_coins(&mut state, SIM_DT);
            state.buffs.advance(SIM_DT);
            ticks += 1;
        }
        let spawned = state.coins.len();
        assert!((24..=27).contains(&spawned), "spawned {}", spawned);
        // Fever ended, nothing more
        for _ in 0..120 {
            fever_coins(&mut state, SIM_DT);
        }
        assert_eq!(state.coins.len(), spawned);
    }

    #[test]
    fn test_fever_respects_coin_cap() {
        let mut state = playing(9);
        state.obstacles.insert(900, Obstacle::new(5.0, 0.0, 3.0));
        for _ in 0..MAX_COINS {
            spawn_coin(&mut state, Vec3::new(3.0, 3.0, 0.0));
        }
        state.buffs.activate(BuffKind::Fever);
        for _ in 0..240 {
            fever_coins(&mut state, SIM_DT);
        }
        assert_eq!(state.coins.len(), MAX_COINS);

        // Once a coin goes away the pending burst fires right away
        let (first, _) = state.coins.iter().next().unwrap();
        state.coins.retire(first);
        state.coins.compact();
        fever_coins(&mut state, SIM_DT);
        assert_eq!(state.coins.len(), MAX_COINS);
    }

    proptest! {
        #[test]
        fn prop_obstacles_respect_spacing(seed in any::<u64>(), frame_ms in 4u32..40) {
            let mut state = playing(seed);
            let dt = frame_ms as f32 / 1000.0;
            spawn_obstacle_set(&mut state);
            for _ in 0..(30.0 / dt) as usize {
                advance_world(&mut state, dt);
                spawn_stage(&mut state, dt);
                state.compact_pools();

                let xs: Vec<f32> = state.obstacles.iter().map(|(_, o)| o.x).collect();
                for pair in xs.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= OBSTACLE_SPACING - 1e-3);
                }
            }
        }

        #[test]
        fn prop_gaps_stay_in_range(seed in any::<u64>()) {
            let mut state = playing(seed);
            let (min_gap, max_gap) = gap_range(GAP_HEIGHT);
            for _ in 0..40 {
                spawn_obstacle_set(&mut state);
                for (_, obs) in state.obstacles.iter_mut() {
                    obs.x = OBSTACLE_CUTOFF_X + 1.0;
                }
            }
            for (_, obs) in state.obstacles.iter_mut() {
                for step in 0..50 {
                    if let Some(osc) = obs.oscillation.as_mut() {
                        osc.time = step as f32 * 0.1;
                    }
                    let g = obs.current_gap_y();
                    prop_assert!(g >= min_gap - 1e-4 && g <= max_gap + 1e-4);
                }
            }
        }
    }
}
