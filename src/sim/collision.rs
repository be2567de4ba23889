//! Collision detection for the shark
//!
//! Barriers are axis-aligned boxes with a gap, so every test here is a cheap
//! box or distance check against the player's centre plus a margin.

use glam::Vec3;

use super::buffs::BuffKind;
use super::state::{Coin, GameEvent, GameState, Item, Obstacle};
use crate::consts::*;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Ground,
    Obstacle,
}

/// Player footprint overlaps the barrier column in x/z
#[inline]
pub fn footprint_overlap(player: Vec3, obs: &Obstacle) -> bool {
    (player.x - obs.x).abs() < obs.width / 2.0 + COLLISION_RADIUS
        && player.z.abs() < obs.depth / 2.0 + COLLISION_RADIUS
}

/// Player is level with a bonus hole that is still open
pub fn in_open_hole(player: Vec3, obs: &Obstacle) -> bool {
    match (obs.hole, obs.hole_center()) {
        (Some(hole), Some(center)) => {
            !hole.collected && (player.y - center.y).abs() <= hole.radius
        }
        _ => false,
    }
}

/// Player touches a barrier (outside the gap and any open hole, within the collision band)
pub fn obstacle_hit(player: Vec3, obs: &Obstacle) -> bool {
    if (player.x - obs.x).abs() > COLLISION_BAND || !footprint_overlap(player, obs) {
        return false;
    }
    if in_open_hole(player, obs) {
        return false;
    }
    let (bottom, top) = obs.gap_bounds();
    player.y > top - COLLISION_RADIUS || player.y < bottom + COLLISION_RADIUS
}

/// Player inside the (uncollected) bonus hole's cube
pub fn bonus_hole_hit(player: Vec3, obs: &Obstacle) -> bool {
    let (Some(hole), Some(center)) = (obs.hole, obs.hole_center()) else {
        return false;
    };
    if hole.collected {
        return false;
    }
    let d = (player - center).abs();
    d.x <= hole.radius && d.y <= hole.radius && d.z <= hole.radius
}

#[inline]
pub fn ground_hit(player_y: f32) -> bool {
    player_y <= GROUND_Y
}

#[inline]
pub fn coin_hit(player: Vec3, coin: &Coin) -> bool {
    !coin.collected && player.distance(coin.pos) < COIN_RADIUS + COIN_PICKUP_RADIUS
}

#[inline]
pub fn item_hit(player: Vec3, item: &Item) -> bool {
    !item.collected && player.distance(item.pos) < ITEM_PICKUP_RADIUS
}

/// Collision stage: apply pickups and bonus holes, report a lethal contact
pub fn collision_stage(state: &mut GameState) -> Option<DeathCause> {
    let player = state.player.pos;

    // Bonus holes first: a hole pass grants immunity before the barrier test
    let mut holes = 0;
    for (_, obs) in state.obstacles.iter_mut() {
        if bonus_hole_hit(player, obs) {
            if let Some(hole) = obs.hole.as_mut() {
                hole.collected = true;
                holes += 1;
            }
        }
    }
    for _ in 0..holes {
        state.bonus_score += BONUS_HOLE_SCORE;
        state.buffs.activate(BuffKind::Immunity);
        state.events.push(GameEvent::BonusHole {
            bonus: BONUS_HOLE_SCORE,
        });
        log::debug!("Bonus hole passed, immunity granted");
    }

    let mut gold = 0;
    for (_, coin) in state.coins.iter_mut() {
        if coin_hit(player, coin) {
            coin.collected = true;
            gold += COIN_GOLD;
        }
    }
    if gold > 0 {
        state.gold += gold;
        state.events.push(GameEvent::CoinCollected { gold });
    }

    let mut picked = Vec::new();
    for (_, item) in state.items.iter_mut() {
        if item_hit(player, item) {
            item.collected = true;
            item.collect_time = 0.0;
            picked.push(item.kind);
        }
    }
    for kind in picked {
        state.buffs.activate(kind.buff());
        state.events.push(GameEvent::ItemCollected { kind });
        log::debug!("Picked up {:?}", kind);
    }

    if ground_hit(player.y) {
        return Some(DeathCause::Ground);
    }
    if !state.buffs.suppresses_obstacles()
        && state.obstacles.iter().any(|(_, obs)| obstacle_hit(player, obs))
    {
        return Some(DeathCause::Obstacle);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BarrierSide, BonusHole, GamePhase, ItemKind};
    use proptest::prelude::*;

    fn at(x: f32, y: f32) -> Vec3 {
        Vec3::new(x, y, 0.0)
    }

    fn playing_with(obs: Obstacle) -> GameState {
        let mut state = GameState::new(1, 0, 0);
        state.phase = GamePhase::Playing;
        state.obstacles.insert(500, obs);
        state
    }

    #[test]
    fn test_player_in_gap_passes() {
        let obs = Obstacle::new(12.0, 0.0, 3.0);
        assert!(!obstacle_hit(at(12.0, 3.0), &obs));
        assert!(obstacle_hit(at(12.0, 5.0), &obs));
        assert!(obstacle_hit(at(12.0, 1.5), &obs));
    }

    #[test]
    fn test_gap_margin() {
        let obs = Obstacle::new(0.0, 0.0, 3.0);
        // Gap spans 2..4, margin 0.25 shrinks it to 2.25..3.75
        assert!(!obstacle_hit(at(0.0, 3.7), &obs));
        assert!(obstacle_hit(at(0.0, 3.8), &obs));
        assert!(obstacle_hit(at(0.0, 2.2), &obs));
    }

    #[test]
    fn test_outside_footprint_never_hits() {
        let obs = Obstacle::new(1.1, 0.0, 3.0);
        assert!(!obstacle_hit(at(0.0, 5.5), &obs));
        let far = Obstacle::new(5.0, 0.0, 3.0);
        assert!(!obstacle_hit(at(0.0, 0.0), &far));
    }

    #[test]
    fn test_bonus_hole_cube() {
        let mut obs = Obstacle::new(0.0, 0.0, 4.0);
        obs.hole = Some(BonusHole {
            side: BarrierSide::Bottom,
            local_y: 1.5,
            radius: 0.35,
            collected: false,
        });
        // Corner of the cube counts, though it lies outside the inscribed sphere
        assert!(bonus_hole_hit(Vec3::new(0.3, 1.8, 0.3), &obs));
        assert!(!bonus_hole_hit(at(0.0, 1.0), &obs));

        obs.hole.as_mut().unwrap().collected = true;
        assert!(!bonus_hole_hit(at(0.0, 1.5), &obs));
    }

    #[test]
    fn test_bonus_hole_grants_once() {
        let mut obs = Obstacle::new(0.0, 0.0, 4.0);
        obs.hole = Some(BonusHole {
            side: BarrierSide::Bottom,
            local_y: 1.5,
            radius: 0.35,
            collected: false,
        });
        let mut state = playing_with(obs);
        state.player.pos = at(0.0, 1.5);

        // Hole sits inside the bottom barrier
        assert_eq!(collision_stage(&mut state), None);
        assert_eq!(state.bonus_score, BONUS_HOLE_SCORE);
        assert!(state.buffs.is_active(BuffKind::Immunity));

        assert_eq!(collision_stage(&mut state), None);
        assert_eq!(state.bonus_score, BONUS_HOLE_SCORE);
        let holes = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BonusHole { .. }))
            .count();
        assert_eq!(holes, 1);
    }

    #[test]
    fn test_shield_suppresses_obstacles_not_ground() {
        let mut state = playing_with(Obstacle::new(0.0, 0.0, 3.0));
        state.player.pos = at(0.0, 5.0);
        assert_eq!(collision_stage(&mut state), Some(DeathCause::Obstacle));

        state.buffs.activate(BuffKind::Shield);
        assert_eq!(collision_stage(&mut state), None);

        state.player.pos = at(0.0, 0.4);
        assert_eq!(collision_stage(&mut state), Some(DeathCause::Ground));

        state.buffs.clear();
        state.buffs.activate(BuffKind::Immunity);
        state.player.pos = at(0.0, 5.0);
        assert_eq!(collision_stage(&mut state), None);

        state.player.pos = at(0.0, 0.4);
        assert_eq!(collision_stage(&mut state), Some(DeathCause::Ground));
    }

    #[test]
    fn test_fly_through_bonus_hole() {
        let mut obs = Obstacle::new(2.5, 0.0, 4.0);
        obs.hole = Some(BonusHole {
            side: BarrierSide::Bottom,
            local_y: 1.5,
            radius: 0.35,
            collected: false,
        });
        let mut state = playing_with(obs);
        state.player.pos = at(0.0, 1.5);

        // Scroll the barrier across the shark, holding it level with the hole
        while state.obstacles.get(500).unwrap().x > -2.5 {
            state.obstacles.get_mut(500).unwrap().x -= SCROLL_SPEED * SIM_DT;
            let x = state.obstacles.get(500).unwrap().x;
            assert_eq!(collision_stage(&mut state), None, "hit at obstacle x {}", x);
            state.buffs.advance(SIM_DT);
        }
        assert_eq!(state.bonus_score, BONUS_HOLE_SCORE);
        assert!(state.obstacles.get(500).unwrap().hole.unwrap().collected);
    }

    #[test]
    fn test_barrier_solid_outside_open_hole() {
        let mut obs = Obstacle::new(0.9, 0.0, 4.0);
        obs.hole = Some(BonusHole {
            side: BarrierSide::Bottom,
            local_y: 1.5,
            radius: 0.35,
            collected: false,
        });
        assert!(!obstacle_hit(at(0.0, 1.5), &obs));
        assert!(obstacle_hit(at(0.0, 1.0), &obs));

        obs.hole.as_mut().unwrap().collected = true;
        assert!(obstacle_hit(at(0.0, 1.5), &obs));
    }

    #[test]
    fn test_item_pickup_activates_buff() {
        let mut state = GameState::new(2, 0, 0);
        state.items.insert(77, Item::new(ItemKind::Fever, at(0.2, 3.0)));
        state.player.pos = at(0.0, 3.0);
        collision_stage(&mut state);
        assert!(state.buffs.is_active(BuffKind::Fever));
        assert!(state.items.get(77).unwrap().collected);
        assert!(state.events.contains(&GameEvent::ItemCollected {
            kind: ItemKind::Fever
        }));
    }

    proptest! {
        #[test]
        fn prop_coin_collected_once(dx in -0.6f32..0.6, dy in -0.3f32..0.3, passes in 1usize..6) {
            let mut state = GameState::new(3, 0, 0);
            state.coins.insert(42, Coin::new(at(dx, 3.0 + dy)));
            state.player.pos = at(0.0, 3.0);

            let hit = coin_hit(state.player.pos, state.coins.get(42).unwrap());
            for _ in 0..passes {
                collision_stage(&mut state);
            }
            let expected = if hit { COIN_GOLD } else { 0 };
            prop_assert_eq!(state.gold, expected);
            prop_assert_eq!(state.coins.get(42).unwrap().collected, hit);
        }
    }
}
