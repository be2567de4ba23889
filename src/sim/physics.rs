//! Player integration and world scroll

use super::state::{GameState, Player};
use crate::consts::*;

/// Semi-implicit Euler step under constant gravity
#[inline]
pub fn integrate(player: &mut Player, dt: f32) {
    player.vel_y += GRAVITY * dt;
    player.pos.y += player.vel_y * dt;
    player.tilt = (player.vel_y * 0.1).clamp(-0.6, 0.6);
}

/// Flap overrides the current vertical velocity
#[inline]
pub fn flap(player: &mut Player) {
    player.vel_y = FLAP_VELOCITY;
}

/// Score for a climbed height (before bonuses)
#[inline]
pub fn height_score(player_y: f32, level_rise_y: f32) -> u64 {
    ((player_y + level_rise_y) * SCORE_PER_UNIT).max(0.0).floor() as u64
}

/// Physics stage: move the player, raise the level, ratchet the score
pub fn step(state: &mut GameState, dt: f32) {
    integrate(&mut state.player, dt);

    let rise = LEVEL_RISE_SPEED * dt;
    state.level_rise_y += rise;
    for (_, obs) in state.obstacles.iter_mut() {
        obs.base_y += rise;
    }
    for (_, coin) in state.coins.iter_mut() {
        coin.pos.y += rise;
    }
    for (_, item) in state.items.iter_mut() {
        item.base_y += rise;
    }

    let candidate = height_score(state.player.pos.y, state.level_rise_y) + state.bonus_score;
    state.score = state.score.max(candidate);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flap_overrides_velocity() {
        let mut player = Player::default();
        player.vel_y = -12.0;
        flap(&mut player);
        assert_eq!(player.vel_y, FLAP_VELOCITY);
    }

    #[test]
    fn test_flap_then_fall_one_second() {
        let mut player = Player::default();
        flap(&mut player);
        let steps = 120;
        for _ in 0..steps {
            integrate(&mut player, 1.0 / steps as f32);
        }
        assert!((player.vel_y - (4.5 - 9.8)).abs() < 1e-3);
        assert!(player.pos.y < PLAY_HEIGHT / 2.0);
    }

    #[test]
    fn test_height_score_clamps_at_zero() {
        assert_eq!(height_score(-3.0, 1.0), 0);
        assert_eq!(height_score(3.0, 0.0), 30);
        assert_eq!(height_score(3.05, 0.1), 31);
    }

    proptest! {
        #[test]
        fn prop_frame_rate_independent(
            y0 in 1.0f32..20.0,
            v0 in -10.0f32..10.0,
            total in 0.05f32..1.5,
            substeps in 2u32..20,
        ) {
            let mut coarse = Player { pos: glam::Vec3::new(0.0, y0, 0.0), vel_y: v0, tilt: 0.0 };
            let mut fine = coarse;

            integrate(&mut coarse, total);
            let h = total / substeps as f32;
            for _ in 0..substeps {
                integrate(&mut fine, h);
            }

            // Velocity is exact for constant acceleration; position error of
            // semi-implicit Euler is bounded by |g| * T * dt / 2
            prop_assert!((coarse.vel_y - fine.vel_y).abs() < 1e-3);
            let bound = GRAVITY.abs() * total * total / 2.0 + 1e-3;
            prop_assert!((coarse.pos.y - fine.pos.y).abs() <= bound);
        }
    }
}
