//! Neo Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neo_breakout::ai::remote::fetch_decision;
    use neo_breakout::ai::{AiClient, Difficulty, Personality, PollAction};
    use neo_breakout::consts::*;
    use neo_breakout::renderer::{build_scene, RenderState};
    use neo_breakout::sim::GamePhase;
    use neo_breakout::{ControlMode, GameSession, HighScores, Settings};

    const AI_ENDPOINT: &str = "/api/paddle-ai";

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        ai: AiClient,
        render_state: Option<RenderState>,
        settings: Settings,
        scores: HighScores,
        paused: bool,
        // Track phase for round-end persistence
        last_phase: GamePhase,
        // Decision latency accumulators for end-of-round stats
        response_total_ms: f64,
        response_samples: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut ai = AiClient::new(AI_ENDPOINT);
            ai.personality = settings.personality();
            ai.difficulty = settings.difficulty();

            Self {
                session: GameSession::new(seed),
                ai,
                render_state: None,
                settings,
                scores: HighScores::load(),
                paused: false,
                last_phase: GamePhase::NotStarted,
                response_total_ms: 0.0,
                response_samples: 0,
            }
        }

        /// One frame: advance the session, then persist on round end
        fn update(&mut self) {
            if self.paused {
                return;
            }
            self.session.frame();

            let phase = self.session.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Win || phase == GamePhase::GameOver {
                    self.finish_round(phase == GamePhase::Win);
                }
                self.last_phase = phase;
            }
        }

        /// Record the finished round before the delayed reset wipes it
        fn finish_round(&mut self, won: bool) {
            let state = &self.session.state;
            if self.scores.record_score(state.score) {
                log::info!("New high score: {}", state.score);
            }

            if self.session.control.mode == ControlMode::Ai {
                let avg_ms = if self.response_samples > 0 {
                    self.response_total_ms / self.response_samples as f64
                } else {
                    0.0
                };
                self.scores.record_ai_round(
                    self.ai.personality,
                    state.score,
                    won,
                    avg_ms,
                    state.paddle_hits,
                    state.paddle_misses,
                );
            }
            self.scores.save();

            self.response_total_ms = 0.0;
            self.response_samples = 0;
        }

        fn record_latency(&mut self, elapsed_ms: f64) {
            self.response_total_ms += elapsed_ms;
            self.response_samples += 1;
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.session.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();
            let state = &self.session.state;

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            set_text("hud-score", &state.score.to_string());
            set_text("hud-lives", &state.lives.to_string());
            set_text("hud-high", &self.scores.high_score.to_string());

            if state.combo >= COMBO_BONUS_MIN {
                set_text("hud-combo", &format!("x{}", state.combo));
            } else {
                set_text("hud-combo", "");
            }

            let effects: String = state
                .effects
                .active_kinds()
                .iter()
                .map(|k| k.symbol())
                .collect();
            set_text("hud-effects", &effects);
            set_text("control-mode", self.session.control.mode.as_str());

            // Start/overlay prompts
            if let Some(el) = document.get_element_by_id("start-prompt") {
                let class = match state.phase {
                    GamePhase::NotStarted => "",
                    _ => "hidden",
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute(
                    "class",
                    if state.phase == GamePhase::GameOver {
                        ""
                    } else {
                        "hidden"
                    },
                );
            }
            if let Some(el) = document.get_element_by_id("win-banner") {
                let _ = el.set_attribute(
                    "class",
                    if state.phase == GamePhase::Win {
                        ""
                    } else {
                        "hidden"
                    },
                );
            }

            // AI metrics panel
            let metrics = self.ai.metrics();
            set_text("ai-status", if metrics.enabled { "ON" } else { "OFF" });
            set_text(
                "connection-status",
                if !metrics.enabled {
                    "OFFLINE"
                } else if metrics.connected {
                    "ONLINE"
                } else {
                    "LOCAL"
                },
            );
            set_text("ai-confidence", &format!("{}%", metrics.confidence));
            set_text("ai-strategy", &metrics.strategy);
            set_text(
                "response-time",
                &format!("{:.0}ms", metrics.response_time_ms),
            );
            set_text("ai-reasoning", &metrics.reasoning);
            set_text("ai-personality", self.ai.personality.display_name());
            if let Some(stats) = self
                .scores
                .personality_stats
                .get(self.ai.personality.as_str())
            {
                set_text("ai-hit-rate", &format!("{:.0}%", stats.hit_rate() * 100.0));
            }
        }
    }

    /// Toggle AI control: enable dispatches the connectivity probe
    fn toggle_ai(game: &Rc<RefCell<Game>>) {
        let enable = {
            let g = game.borrow();
            !g.ai.enabled()
        };

        if enable {
            let probe = {
                let mut g = game.borrow_mut();
                g.session.control.set_ai(true);
                g.ai.enable()
            };
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let endpoint = game.borrow().ai.endpoint().to_string();
                let result = fetch_decision(&endpoint, &probe).await.map(|_| ());
                game.borrow_mut().ai.complete_probe(result);
            });
        } else {
            let mut g = game.borrow_mut();
            g.ai.disable();
            g.session.control.set_ai(false);
        }
    }

    fn set_personality(game: &Rc<RefCell<Game>>, personality: Personality) {
        let mut g = game.borrow_mut();
        g.ai.personality = personality;
        g.settings.set_personality(personality);
        g.settings.save();
        log::info!("Personality set to {}", personality.display_name());
    }

    /// One orchestrator poll cycle, fired by the fixed-interval timer
    fn ai_poll(game: &Rc<RefCell<Game>>) {
        let action = {
            let mut g = game.borrow_mut();
            let snapshot = g.session.state.snapshot();
            g.ai.poll(&snapshot)
        };

        match action {
            PollAction::Skip => {}
            PollAction::Local(decision) => {
                game.borrow_mut().session.control.ai_target = Some(decision.paddle_x);
            }
            PollAction::Remote(request) => {
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let endpoint = game.borrow().ai.endpoint().to_string();
                    let started = js_sys::Date::now();
                    let result = fetch_decision(&endpoint, &request).await;
                    let elapsed = js_sys::Date::now() - started;

                    let mut g = game.borrow_mut();
                    // Applied against whatever state is current; a stale
                    // in-flight result is accepted best-effort
                    let snapshot = g.session.state.snapshot();
                    if let Some(decision) = g.ai.complete_remote(result, &snapshot, elapsed) {
                        g.session.control.ai_target = Some(decision.paddle_x);
                        g.record_latency(elapsed);
                    }
                });
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neo Breakout starting...");

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
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_ui_controls(game.clone());
        setup_ai_timer(game.clone());

        request_animation_frame(game);

        log::info!("Neo Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard down: steering, laser fire, AI toggle, personality cycle
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => game.borrow_mut().session.control.key_down(true),
                    "ArrowRight" | "d" | "D" => game.borrow_mut().session.control.key_down(false),
                    " " => {
                        event.prevent_default();
                        let mut g = game.borrow_mut();
                        g.session.control.fire_held = true;
                        g.session.control.start_requested = true;
                    }
                    "i" | "I" => toggle_ai(&game),
                    "p" | "P" => {
                        let next = game.borrow_mut().ai.cycle_personality();
                        let mut g = game.borrow_mut();
                        g.settings.set_personality(next);
                        g.settings.save();
                    }
                    _ => {
                        game.borrow_mut().session.control.start_requested = true;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.session.control.key_up(true),
                    "ArrowRight" | "d" | "D" => g.session.control.key_up(false),
                    " " => g.session.control.fire_held = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move steers in playfield coordinates
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let scale = CANVAS_WIDTH / canvas_clone.client_width().max(1) as f32;
                game.borrow_mut()
                    .session
                    .control
                    .pointer_moved(event.offset_x() as f32 * scale);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click starts the round
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.control.start_requested = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let scale = CANVAS_WIDTH / canvas_clone.client_width().max(1) as f32;
                    game.borrow_mut().session.control.pointer_moved(x * scale);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (also a start input)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.session.control.start_requested = true;
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let scale = CANVAS_WIDTH / canvas_clone.client_width().max(1) as f32;
                    g.session.control.pointer_moved(x * scale);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_ui_controls(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.control.start_requested = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.paused = !g.paused;
                log::info!("{}", if g.paused { "Paused" } else { "Resumed" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("ai-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_ai(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(select) = document.get_element_by_id("personality-select") {
            if let Ok(select) = select.dyn_into::<HtmlSelectElement>() {
                let game = game.clone();
                let select_clone = select.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    if let Some(p) = Personality::from_str(&select_clone.value()) {
                        set_personality(&game, p);
                    }
                });
                let _ = select
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(select) = document.get_element_by_id("difficulty-select") {
            if let Ok(select) = select.dyn_into::<HtmlSelectElement>() {
                let game = game.clone();
                let select_clone = select.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    if let Some(d) = Difficulty::from_str(&select_clone.value()) {
                        let mut g = game.borrow_mut();
                        g.ai.difficulty = d;
                        g.settings.set_difficulty(d);
                        g.settings.save();
                        log::info!("Difficulty set to {}", d.as_str());
                    }
                });
                let _ = select
                    .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// Fixed-interval decision timer, independent of the frame loop
    fn setup_ai_timer(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            ai_poll(&game);
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            AI_POLL_INTERVAL_MS,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neo_breakout::ai::{LocalProvider, Personality};
    use neo_breakout::sim::GamePhase;
    use neo_breakout::GameSession;

    env_logger::init();
    log::info!("Neo Breakout (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: let the balanced heuristic play one round
    let mut session = GameSession::with_provider(
        42,
        Box::new(LocalProvider {
            personality: Personality::Balanced,
        }),
    );
    session.control.set_ai(true);
    session.control.start_requested = true;

    let mut frames = 0u32;
    while session.state.phase != GamePhase::Win
        && session.state.phase != GamePhase::GameOver
        && frames < 60 * 120
    {
        session.frame();
        frames += 1;
    }

    println!(
        "Round over after {} frames: {:?}, score {}, {} bricks left",
        frames,
        session.state.phase,
        session.state.score,
        session.state.bricks_remaining()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
