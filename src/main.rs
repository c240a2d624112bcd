//! Skyhop entry point
//!
//! In the browser this drives the game from `requestAnimationFrame`. Natively
//! it serves the leaderboard endpoint the browser build talks to.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use skyhop::consts::LEADERBOARD_ENDPOINT;
    use skyhop::game::{FrameStatus, Session};
    use skyhop::leaderboard::record::format_age;
    use skyhop::leaderboard::{HttpApi, Leaderboard, SubmissionError};
    use skyhop::platform::{FrameClock, apply_key};
    use skyhop::settings::Tuning;
    use skyhop::sim::{GameEvent, GamePhase, InputState};

    /// Everything the frame loop and the DOM callbacks share
    struct Game {
        session: Session<HttpApi>,
        input: InputState,
        clock: FrameClock,
        /// A frame callback is scheduled
        looping: bool,
    }

    impl Game {
        fn new(tuning: Tuning) -> Self {
            let clock = FrameClock::new(tuning.max_frame_dt);
            Self {
                session: Session::new(tuning, HttpApi::new(LEADERBOARD_ENDPOINT)),
                input: InputState::default(),
                clock,
                looping: false,
            }
        }

        fn update_hud(&self, document: &Document) {
            let state = self.session.state();
            set_text(document, "hud-score", &state.score.to_string());
            set_text(document, "hud-height", &format!("{:.1}", state.camera.height));
            set_text(
                document,
                "hud-speed",
                &format!("{:.3}", state.camera.speed(&state.tuning)),
            );
            set_visible(document, "start-prompt", state.phase == GamePhase::Idle);
        }
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn submit_button(document: &Document) -> Option<HtmlButtonElement> {
        document.get_element_by_id("submit-btn")?.dyn_into().ok()
    }

    fn render_leaderboard(board: &Leaderboard) {
        let Some(document) = current_document() else { return };
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_text_content(None);

        let now = js_sys::Date::now() as u64;
        for (i, entry) in board.entries().iter().enumerate() {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            item.set_text_content(Some(&format!(
                "{}. {} {} ({})",
                i + 1,
                entry.name,
                entry.score,
                format_age(now, entry.id)
            )));
            let _ = list.append_child(&item);
        }
        set_visible(&document, "leaderboard-empty", board.is_empty());
    }

    fn start_run(game: &Rc<RefCell<Game>>) {
        let seed = js_sys::Date::now() as u64;
        let schedule = {
            let mut g = game.borrow_mut();
            g.session.start(seed);
            g.input = InputState::default();
            g.clock.reset();
            !std::mem::replace(&mut g.looping, true)
        };

        if let Some(document) = current_document() {
            set_visible(&document, "game-over", false);
            set_visible(&document, "submit-form", false);
        }

        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let status = {
            let mut g = game.borrow_mut();
            let dt = g.clock.delta(time);
            let input = g.input;
            let status = g.session.frame(&input, dt);

            for event in g.session.drain_events() {
                match event {
                    GameEvent::Jumped => log::trace!("jump"),
                    GameEvent::Landed { platform_y } => log::trace!("landed at {platform_y:.1}"),
                    GameEvent::GameOver { score } => log::debug!("game over event, score {score}"),
                }
            }

            if let Some(document) = current_document() {
                g.update_hud(&document);
            }
            if status != FrameStatus::Continue {
                g.looping = false;
            }
            status
        };

        match status {
            FrameStatus::Continue => request_animation_frame(game),
            FrameStatus::GameOver { score } => show_game_over(&game, score),
            FrameStatus::Stopped => {}
        }
    }

    fn show_game_over(game: &Rc<RefCell<Game>>, score: u64) {
        if let Some(document) = current_document() {
            set_text(&document, "final-score", &score.to_string());
            set_visible(&document, "game-over", true);
            set_visible(&document, "submit-form", false);
        }

        let (board, run) = {
            let g = game.borrow();
            (g.session.leaderboard(), g.session.run_id())
        };
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let rank = board.check_qualifies(score).await;
            render_leaderboard(&board.cached());

            // A new run may have started while the board was loading
            if game.borrow().session.submittable_score(run).is_none() {
                return;
            }
            let Some(document) = current_document() else { return };
            if let Some(rank) = rank {
                set_text(&document, "qualify-rank", &format!("#{rank}"));
                set_text(&document, "submit-status", "");
                if let Some(button) = submit_button(&document) {
                    button.set_disabled(false);
                }
                set_visible(&document, "submit-form", true);
            }
        });
    }

    fn setup_keyboard(game: &Rc<RefCell<Game>>, window: &web_sys::Window) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Typing a name must not steer the player
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    return;
                }
                if key == "Enter" {
                    let phase = game.borrow().session.phase();
                    if phase != GamePhase::Running {
                        start_run(&game);
                    }
                    return;
                }
                if apply_key(&mut game.borrow_mut().input, &key, true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                apply_key(&mut game.borrow_mut().input, &event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: &Rc<RefCell<Game>>, document: &Document) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start_run(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = submit_button(document) {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = current_document() else { return };
                let name = document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                let (board, score) = {
                    let g = game.borrow();
                    (g.session.leaderboard(), g.session.submittable_score(g.session.run_id()))
                };
                let Some(score) = score else {
                    set_visible(&document, "submit-form", false);
                    return;
                };

                if let Some(button) = submit_button(&document) {
                    button.set_disabled(true);
                }
                set_text(&document, "submit-status", "Submitting...");

                wasm_bindgen_futures::spawn_local(async move {
                    let result = board.submit(&name, score).await;
                    let Some(document) = current_document() else { return };
                    match result {
                        Ok(entry) => {
                            set_text(&document, "submit-status", &format!("Saved as {}", entry.name));
                            set_visible(&document, "submit-form", false);
                            render_leaderboard(&board.cached());
                        }
                        Err(SubmissionError::InFlight) => {}
                        Err(e) => {
                            log::warn!("Submit failed: {e}");
                            set_text(&document, "submit-status", "Could not save score, try again");
                            if let Some(button) = submit_button(&document) {
                                button.set_disabled(false);
                            }
                        }
                    }
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Skyhop starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game::new(Tuning::load())));
        game.borrow().update_hud(&document);

        setup_keyboard(&game, &window);
        setup_buttons(&game, &document);

        // Show the current board on the title screen
        let board = game.borrow().session.leaderboard();
        wasm_bindgen_futures::spawn_local(async move {
            board.refresh().await;
            render_leaderboard(&board.cached());
        });

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use skyhop::leaderboard::DirStore;
    use skyhop::server::{ServerConfig, router};

    env_logger::init();

    let config = ServerConfig::from_env();
    let store = Arc::new(DirStore::new(&config.data_dir));
    log::info!("Storing scores under {}", config.data_dir.display());

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    log::info!("Leaderboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(store)).await?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
