//! Ocean Angler entry point
//!
//! On the web this is the browser host: input listeners, the fixed-step loop,
//! HUD updates and leaderboard traffic. Natively it runs a headless
//! autopiloted session and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use glam::Vec2;
    use ocean_angler::consts::*;
    use ocean_angler::leaderboard::{self, Leaderboard, RefreshTimer};
    use ocean_angler::persistence::{Category, submit_all};
    use ocean_angler::platform::{self, FetchSink};
    use ocean_angler::sim::{Phase, SessionState, SimEvent, TickInput, UiSnapshot, select_character, tick};
    use ocean_angler::sim::StoreAction;
    use ocean_angler::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: SessionState,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        canvas_size: (f32, f32),
        /// Events produced since the last frame, already filtered by settings
        events: Vec<SimEvent>,
        snapshot: Option<UiSnapshot>,
        sink: Option<FetchSink>,
        leaderboards: Vec<Leaderboard>,
        refresh: RefreshTimer,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, tuning: Tuning) -> Self {
            let sink = settings
                .leaderboard_enabled()
                .then(|| FetchSink::new(leaderboard::submit_url(&settings.leaderboard_endpoint)));
            let mut refresh = RefreshTimer::new(settings.leaderboard_refresh_secs);
            refresh.force();
            Self {
                state: SessionState::with_tuning(seed, tuning),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                canvas_size: (0.0, 0.0),
                events: Vec::new(),
                snapshot: None,
                sink,
                leaderboards: Category::ALL.iter().map(|&c| Leaderboard::new(c)).collect(),
                refresh,
            }
        }

        /// Camera left edge in world space; the view follows the angler
        fn camera_x(&self) -> f32 {
            let t = &self.state.tuning;
            let half = self.canvas_size.0 / 2.0;
            (self.state.angler.pos.x - half).clamp(0.0, (t.world_width - self.canvas_size.0).max(0.0))
        }

        fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
            Vec2::new(x + self.camera_x(), y)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                let report = tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                let events = self.settings.filter_events(report.events);
                self.events.extend(events);
                self.snapshot = Some(report.snapshot);

                // Clear one-shot inputs after processing
                self.input.primary_pressed = false;
                self.input.secondary_pressed = false;
                self.input.interact = false;
                self.input.hotbar = None;
                self.input.pause = false;
                self.input.store = None;
            }

            if self.state.phase == Phase::CharacterSelect {
                let name = self.settings.player_name.clone();
                if select_character(&mut self.state, self.settings.character, &name) {
                    log::info!("Session started as {}", self.state.display_name());
                }
            }

            self.flush_scores();
            if self.sink.is_some() && self.refresh.tick(dt) {
                refresh_leaderboards(self.settings.leaderboard_endpoint.clone());
            }
        }

        /// Merge banked records into the local boards, then send them off
        fn flush_scores(&mut self) {
            if self.state.outbox.is_empty() {
                return;
            }
            for record in &self.state.outbox {
                for board in &mut self.leaderboards {
                    if let Some(rank) = board.record(record) {
                        log::info!("New {} entry at rank {}", board.category.as_str(), rank);
                    }
                }
            }
            match self.sink.as_mut() {
                Some(sink) => {
                    submit_all(&mut self.state.outbox, sink);
                }
                None => self.state.outbox.clear(),
            }
        }

        /// Hand the latest snapshot and events to the page's renderer
        fn publish(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let events = std::mem::take(&mut self.events);
            if let Some(snapshot) = &self.snapshot {
                if let Ok(json) = serde_json::to_string(snapshot) {
                    let _ = js_sys::Reflect::set(&window, &"oceanAnglerSnapshot".into(), &json.into());
                }
            }
            if let Ok(json) = serde_json::to_string(&events) {
                let _ = js_sys::Reflect::set(&window, &"oceanAnglerEvents".into(), &json.into());
            }
            if let Ok(json) = serde_json::to_string(&self.leaderboards) {
                let _ = js_sys::Reflect::set(&window, &"oceanAnglerLeaderboards".into(), &json.into());
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(snap) = &self.snapshot else {
                return;
            };
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-money .hud-value", &format!("${}", snap.money));
            set_text("#hud-score .hud-value", &snap.score.to_string());
            set_text("#hud-level .hud-value", &snap.level.to_string());
            set_text("#hud-caught .hud-value", &snap.total_caught.to_string());
            set_text("#hud-weather .hud-value", &snap.weather);

            // Combo (only show when 2+)
            if let Some(el) = document.get_element_by_id("hud-combo") {
                if snap.combo > 1 {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text("#hud-combo .hud-value", &snap.combo.to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("alert") {
                match &snap.alert {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("pause-menu") {
                let class = if snap.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn refresh_leaderboards(endpoint: String) {
        let Some(game) = GAME.with(|g| g.borrow().clone()) else {
            return;
        };
        for (i, category) in Category::ALL.into_iter().enumerate() {
            let url = leaderboard::board_url(&endpoint, category);
            let game = game.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match platform::fetch_text(&url).await {
                    Ok(body) => match Leaderboard::from_json(category, &body) {
                        Ok(board) => game.borrow_mut().leaderboards[i] = board,
                        Err(e) => log::warn!("{}", e),
                    },
                    Err(e) => log::warn!("Leaderboard fetch ({}) failed: {}", category.as_str(), e),
                }
            });
        }
    }

    /// Queue a shop request from the page, e.g. `{"BuyLure":1}`
    #[wasm_bindgen]
    pub fn store_action(json: &str) -> Result<(), JsValue> {
        let action: StoreAction =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        GAME.with(|g| {
            if let Some(game) = g.borrow().as_ref() {
                game.borrow_mut().input.store = Some(action);
            }
        });
        Ok(())
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }

        log::info!("Ocean Angler starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(seed, settings, Tuning::load())));
        game.borrow_mut().canvas_size = (canvas.client_width() as f32, canvas.client_height() as f32);
        GAME.with(|g| *g.borrow_mut() = Some(game.clone()));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Ocean Angler running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.canvas_size = (canvas_clone.client_width() as f32, canvas_clone.client_height() as f32);
                let aim = g.screen_to_world(event.offset_x() as f32, event.offset_y() as f32);
                g.input.aim = Some(aim);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - left is primary, right is secondary
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                match event.button() {
                    0 => {
                        g.input.primary_pressed = true;
                        g.input.primary_held = true;
                    }
                    2 => {
                        g.input.secondary_pressed = true;
                        g.input.secondary_held = true;
                    }
                    _ => {}
                }
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                match event.button() {
                    0 => g.input.primary_held = false,
                    2 => g.input.secondary_held = false,
                    _ => {}
                }
            });
            let _ = canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Suppress the context menu so right click can reel out
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = canvas.add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let repeat = event.repeat();
                match event.key().as_str() {
                    " " | "Enter" => {
                        g.input.primary_pressed |= !repeat;
                        g.input.primary_held = true;
                    }
                    "Escape" => g.input.pause |= !repeat,
                    "a" | "A" | "ArrowLeft" => g.input.move_left = true,
                    "d" | "D" | "ArrowRight" => g.input.move_right = true,
                    "s" | "S" | "ArrowDown" => {
                        g.input.secondary_pressed |= !repeat;
                        g.input.secondary_held = true;
                    }
                    "e" | "E" => g.input.interact |= !repeat,
                    "Shift" => g.input.power_reel_held = true,
                    "q" | "Q" => g.input.let_out_line = true,
                    "p" | "P" if !repeat => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    key => {
                        if let Ok(slot @ 1..=5) = key.parse::<u8>() {
                            g.input.hotbar = Some(slot);
                        }
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => g.input.primary_held = false,
                    "a" | "A" | "ArrowLeft" => g.input.move_left = false,
                    "d" | "D" | "ArrowRight" => g.input.move_right = false,
                    "s" | "S" | "ArrowDown" => g.input.secondary_held = false,
                    "Shift" => g.input.power_reel_held = false,
                    "q" | "Q" => g.input.let_out_line = false,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.publish();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.state.paused && !g.state.phase.is_cosmetic() {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.state.paused && !g.state.phase.is_cosmetic() {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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
    use ocean_angler::consts::{SIM_DT, SIM_HZ};
    use ocean_angler::persistence::{LogSink, submit_all};
    use ocean_angler::Tuning;
    use ocean_angler::sim::{SessionState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let minutes: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5.0);
    let ticks = (minutes * 60.0 * SIM_HZ) as u64;

    log::info!("Ocean Angler (native) starting: seed {}, {} simulated minutes", seed, minutes);

    // Balance override: OCEAN_ANGLER_TUNING=path/to/tuning.json
    let tuning = match std::env::var("OCEAN_ANGLER_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_override(Some(&json)),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut state = SessionState::with_tuning(seed, tuning);
    let mut sink = LogSink;
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut last = None;
    for _ in 0..ticks {
        let report = tick(&mut state, &input, SIM_DT);
        submit_all(&mut state.outbox, &mut sink);
        last = Some(report.snapshot);
    }

    if let Some(snap) = last {
        log::info!(
            "Session over: {} caught, best combo {}, level {}, ${} and {} points",
            snap.total_caught,
            snap.best_combo,
            snap.level,
            snap.money,
            snap.score
        );
        if let Some(biggest) = snap.biggest_catch {
            log::info!("Biggest catch: {} ({} lbs)", biggest.name, biggest.weight);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
