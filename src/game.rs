//! Frame driver
//!
//! `Game` owns the session state and its injected gateways. Each animation
//! frame it turns the elapsed time into fixed simulation steps, persists the
//! economy when it changes, mirrors the entities into the scene and hands the
//! HUD a fresh snapshot.

use crate::assets::AssetLibrary;
use crate::consts::*;
use crate::persistence::Storage;
use crate::records::Records;
use crate::scene::{SceneGateway, SceneSync};
use crate::settings::{GraphicsPreset, Settings};
use crate::sim::{GameEvent, GamePhase, GameState, RespawnError, TickInput, session, tick};
use crate::ui::{HudSink, HudState, NullHud};

/// A running game wired to its gateways
pub struct Game<S: Storage, G: SceneGateway, H: HudSink = NullHud> {
    pub state: GameState,
    settings: Settings,
    storage: S,
    scene: G,
    hud: H,
    sync: SceneSync,
    records: Records,
    accumulator: f32,
    /// One-shot input latched until the next simulation step
    input: TickInput,
    autopilot: bool,
    // FPS tracking
    frame_times: [f32; 60],
    frame_index: usize,
}

impl<S: Storage, G: SceneGateway, H: HudSink> Game<S, G, H> {
    pub fn new(
        seed: u64,
        storage: S,
        scene: G,
        hud: H,
        settings: Settings,
        library: AssetLibrary,
    ) -> Self {
        let records = Records::load(&storage);
        let state = GameState::new(seed, records.gold, records.high_score);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            sync: SceneSync::new(library, settings.graphics),
            settings,
            storage,
            scene,
            hud,
            records,
            accumulator: 0.0,
            input: TickInput::default(),
            autopilot: false,
            frame_times: [0.0; 60],
            frame_index: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &G {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut G {
        &mut self.scene
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// Flap on the next step (also starts the run)
    pub fn flap(&mut self) {
        if self.state.phase != GamePhase::Resuming {
            self.input.flap = true;
        }
    }

    /// Escape key: pause while playing, resume while paused
    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.input.pause = true,
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Pause right away (tab hidden, window blur)
    pub fn pause(&mut self) {
        session::pause(&mut self.state);
    }

    pub fn resume(&mut self) {
        session::resume(&mut self.state, self.settings.resume_countdown);
    }

    pub fn start(&mut self) {
        session::start(&mut self.state);
    }

    /// New run from the game-over screen
    pub fn reset(&mut self) {
        session::reset(&mut self.state);
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }

    pub fn respawn(&mut self) -> Result<(), RespawnError> {
        session::respawn(&mut self.state)?;
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.persist();
        Ok(())
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot: {}", on);
        }
        self.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Switch graphics presets; the simulation is untouched
    pub fn set_preset(&mut self, preset: GraphicsPreset) {
        self.settings.graphics = preset;
        self.settings.save();
        self.sync.set_preset(preset, &mut self.scene);
    }

    pub fn set_resume_countdown(&mut self, on: bool) {
        self.settings.resume_countdown = on;
        self.settings.save();
    }

    /// Run simulation ticks for one frame
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                autopilot: self.autopilot,
                ..std::mem::take(&mut self.input)
            };
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.track_fps(dt);
        self.handle_events();
        self.persist();
        substeps
    }

    fn track_fps(&mut self, dt: f32) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
    }

    pub fn fps(&self) -> u32 {
        let total: f32 = self.frame_times.iter().sum();
        if total > 0.0 {
            (self.frame_times.len() as f32 / total).round() as u32
        } else {
            0
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::GameOver {
                    score,
                    new_high_score,
                    respawn,
                } => {
                    if new_high_score {
                        log::info!("New high score: {}", score);
                    }
                    if !respawn.affordable() {
                        log::info!("Respawn unavailable: {}", respawn.message());
                    }
                }
                GameEvent::CoinCollected { gold } => log::debug!("+{} gold", gold),
                GameEvent::BonusHole { bonus } => log::info!("Bonus hole! +{}", bonus),
                GameEvent::ItemCollected { kind } => log::info!("Picked up {:?}", kind),
                GameEvent::BuffExpired { kind } => log::debug!("{} over", kind.label()),
                _ => {}
            }
        }
    }

    /// Write gold and high score when they changed
    fn persist(&mut self) {
        let current = Records {
            gold: self.state.gold,
            high_score: self.state.high_score,
        };
        self.records.sync(current, &mut self.storage);
    }

    /// Mirror the state into the scene, draw and refresh the HUD
    pub fn render(&mut self) {
        self.sync.sync(&self.state, &self.settings, &mut self.scene);
        self.scene.render();

        let mut hud = HudState::from_state(&self.state);
        if self.settings.show_fps {
            hud.fps = Some(self.fps());
        }
        self.hud.show(&hud);
    }

    /// One animation frame: simulate, then present
    pub fn frame(&mut self, frame_dt: f32) {
        self.update(frame_dt);
        self.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{GOLD_KEY, HIGH_SCORE_KEY, MemoryStorage};
    use crate::scene::HeadlessScene;

    type TestGame = Game<MemoryStorage, HeadlessScene, NullHud>;

    fn game(seed: u64, storage: MemoryStorage, preset: GraphicsPreset) -> TestGame {
        Game::new(
            seed,
            storage,
            HeadlessScene::new(),
            NullHud,
            Settings::from_preset(preset),
            AssetLibrary::embedded(),
        )
    }

    #[test]
    fn test_substeps_per_frame() {
        let mut g = game(1, MemoryStorage::new(), GraphicsPreset::Prototype);
        // 60 Hz frame = two 120 Hz steps
        g.flap();
        assert_eq!(g.update(1.0 / 60.0 + 1e-4), 2);
        assert_eq!(g.state.phase, GamePhase::Playing);
        // Long stall is clamped
        assert_eq!(g.update(5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_loads_and_persists_records() {
        let storage = MemoryStorage::new().with(GOLD_KEY, 120).with(HIGH_SCORE_KEY, 5);
        let mut g = game(2, storage, GraphicsPreset::Prototype);
        assert_eq!(g.state.gold, 120);
        g.flap();
        g.frame(1.0 / 60.0);
        assert_eq!(g.storage().writes, 0);

        // Fall into the water
        for _ in 0..120 {
            g.frame(1.0 / 60.0);
        }
        assert_eq!(g.state.phase, GamePhase::GameOver);
        assert_eq!(g.storage().read_int(HIGH_SCORE_KEY, 0), g.state.high_score);
        assert!(g.state.high_score > 5);

        g.respawn().unwrap();
        assert_eq!(g.storage().read_int(GOLD_KEY, 0), 20);
        assert_eq!(g.respawn(), Err(RespawnError::NotGameOver));
    }

    #[test]
    fn test_preset_does_not_change_simulation() {
        let mut full = game(77, MemoryStorage::new(), GraphicsPreset::Full);
        let mut proto = game(77, MemoryStorage::new(), GraphicsPreset::Prototype);
        full.set_autopilot(true);
        proto.set_autopilot(true);

        for i in 0..900 {
            if i == 300 {
                full.set_preset(GraphicsPreset::Prototype);
                proto.set_preset(GraphicsPreset::Full);
            }
            full.frame(1.0 / 60.0);
            proto.frame(1.0 / 60.0);
        }
        assert_eq!(full.state.score, proto.state.score);
        assert_eq!(full.state.gold, proto.state.gold);
        assert_eq!(full.state.phase, proto.state.phase);
        assert_eq!(full.state.player, proto.state.player);
        assert_eq!(full.scene().node_count(), proto.scene().node_count());
    }

    #[test]
    fn test_pause_toggle_uses_countdown_setting() {
        let mut g = game(3, MemoryStorage::new(), GraphicsPreset::Prototype);
        g.set_resume_countdown(false);
        g.start();
        g.toggle_pause();
        g.update(SIM_DT);
        assert_eq!(g.state.phase, GamePhase::Paused);
        g.toggle_pause();
        assert_eq!(g.state.phase, GamePhase::Playing);

        g.set_resume_countdown(true);
        g.pause();
        g.toggle_pause();
        assert_eq!(g.state.phase, GamePhase::Resuming);
        // Flaps during the countdown are dropped
        g.flap();
        for _ in 0..200 {
            g.update(1.0 / 60.0);
        }
        assert_eq!(g.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_render_keeps_scene_in_step() {
        let mut g = game(4, MemoryStorage::new(), GraphicsPreset::Full);
        g.flap();
        for _ in 0..60 {
            g.frame(1.0 / 60.0);
        }
        let live = g.state.obstacles.len()
            + g.state.coins.len()
            + g.state.items.len()
            + g.state.decorations.len();
        assert_eq!(g.scene().node_count(), live + 1);
        assert_eq!(g.scene().frames, 60);
        let player = g.scene().player().copied().unwrap();
        assert_eq!(player.pos, g.state.player.pos);
    }
}
