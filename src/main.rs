//! Flappy Shark entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, TouchEvent};

    use flappy_shark::assets::AssetLibrary;
    use flappy_shark::consts::*;
    use flappy_shark::persistence::LocalStorage;
    use flappy_shark::renderer::{RenderState, WgpuScene};
    use flappy_shark::sim::{BuffKind, GamePhase};
    use flappy_shark::ui::{HudSink, HudState};
    use flappy_shark::{Game, Settings};

    type WebGame = Game<LocalStorage, WgpuScene, DomHud>;

    /// HUD backed by DOM elements looked up by id
    struct DomHud {
        document: Document,
        /// Ids already reported missing
        missing: HashSet<&'static str>,
    }

    impl DomHud {
        fn new(document: Document) -> Self {
            Self {
                document,
                missing: HashSet::new(),
            }
        }

        fn element(&mut self, id: &'static str) -> Option<Element> {
            let el = self.document.get_element_by_id(id);
            if el.is_none() && self.missing.insert(id) {
                log::warn!("HUD element #{} not found", id);
            }
            el
        }

        fn set_text(&mut self, id: &'static str, text: &str) {
            if let Some(el) = self.element(id) {
                if el.text_content().as_deref() != Some(text) {
                    el.set_text_content(Some(text));
                }
            }
        }

        fn set_hidden(&mut self, id: &'static str, hidden: bool) {
            if let Some(el) = self.element(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn buff(&mut self, id: &'static str, hud: &HudState, kind: BuffKind) {
            match hud.buff_label(kind) {
                Some(label) => {
                    self.set_text(id, &label);
                    self.set_hidden(id, false);
                }
                None => self.set_hidden(id, true),
            }
        }
    }

    impl HudSink for DomHud {
        fn show(&mut self, hud: &HudState) {
            self.set_text("hud-score", &hud.score.to_string());
            self.set_text("hud-gold", &hud.gold.to_string());
            self.set_text("hud-high-score", &hud.high_score.to_string());

            self.buff("buff-shield", hud, BuffKind::Shield);
            self.buff("buff-fever", hud, BuffKind::Fever);
            self.buff("buff-immunity", hud, BuffKind::Immunity);

            match hud.countdown {
                Some(n) => {
                    self.set_text("countdown", &n.to_string());
                    self.set_hidden("countdown", false);
                }
                None => self.set_hidden("countdown", true),
            }

            match hud.fps {
                Some(fps) => {
                    self.set_text("hud-fps", &fps.to_string());
                    self.set_hidden("hud-fps", false);
                }
                None => self.set_hidden("hud-fps", true),
            }

            self.set_hidden("start-screen", hud.phase != GamePhase::NotStarted);
            self.set_hidden("pause-menu", hud.phase != GamePhase::Paused);
            self.set_hidden("game-over", hud.phase != GamePhase::GameOver);

            if let Some(offer) = hud.respawn {
                self.set_text("final-score", &hud.score.to_string());
                if let Some(btn) = self
                    .element("respawn-btn")
                    .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
                {
                    btn.set_disabled(!offer.affordable());
                    let text = offer.message();
                    if btn.text_content().as_deref() != Some(text.as_str()) {
                        btn.set_text_content(Some(&text));
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flappy Shark starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            LocalStorage::new(),
            WgpuScene::new(),
            DomHud::new(document.clone()),
            settings,
            AssetLibrary::embedded(),
        )));

        // Initialize WebGPU; without it the game still runs, undrawn
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().scene_mut().attach(rs),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game, 0.0);

        log::info!("Flappy Shark running!");
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<WebGame>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        {
            let game = game.clone();
            on_click(&document, "start-btn", move || game.borrow_mut().start());
        }
        {
            let game = game.clone();
            on_click(&document, "resume-btn", move || game.borrow_mut().resume());
        }
        {
            let game = game.clone();
            on_click(&document, "restart-btn", move || game.borrow_mut().reset());
        }
        {
            let game = game.clone();
            on_click(&document, "respawn-btn", move || {
                if let Err(e) = game.borrow_mut().respawn() {
                    log::info!("Respawn refused: {}", e);
                }
            });
        }
        on_click(&document, "preset-btn", move || {
            let mut g = game.borrow_mut();
            let preset = g.settings().graphics.toggled();
            g.set_preset(preset);
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
        // Mouse flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch flap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        g.flap();
                    }
                    "Escape" | "p" | "P" => g.toggle_pause(),
                    "a" | "A" => {
                        let on = !g.autopilot();
                        g.set_autopilot(on);
                    }
                    "g" | "G" => {
                        let preset = g.settings().graphics.toggled();
                        g.set_preset(preset);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<WebGame>>, last_time: f64) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time, last_time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<WebGame>>, time: f64, last_time: f64) {
        {
            let dt = if last_time > 0.0 {
                ((time - last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            game.borrow_mut().frame(dt);
        }

        request_animation_frame(game, time);
    }

    fn setup_auto_pause(game: Rc<RefCell<WebGame>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_shark::assets::AssetLibrary;
    use flappy_shark::persistence::MemoryStorage;
    use flappy_shark::scene::HeadlessScene;
    use flappy_shark::sim::GamePhase;
    use flappy_shark::ui::NullHud;
    use flappy_shark::{Game, Settings};

    env_logger::init();
    log::info!("Flappy Shark (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    let mut game = Game::new(
        seed,
        MemoryStorage::new(),
        HeadlessScene::new(),
        NullHud,
        Settings::default(),
        AssetLibrary::embedded(),
    );
    game.set_autopilot(true);

    let frame_dt = 1.0 / 60.0;
    for _ in 0..seconds * 60 {
        game.frame(frame_dt);
        if game.state.phase == GamePhase::GameOver {
            break;
        }
    }

    let state = &game.state;
    log::info!(
        "Demo finished: phase {:?}, score {}, gold {}, {} scene nodes",
        state.phase,
        state.score,
        state.gold,
        game.scene().node_count()
    );
    println!(
        "seed {} -> score {}, gold {}, climbed {:.1} units",
        seed, state.score, state.gold, state.level_rise_y
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
