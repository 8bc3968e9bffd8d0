//! Browser game loop and input wiring

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, KeyboardEvent, Window};

use super::dom::DomStage;
use crate::config::GameConfig;
use crate::consts::MAX_FRAME_MS;
use crate::sim::{FishId, GameMode, GameState};

/// Game instance holding all state
pub struct Game {
    state: GameState,
    stage: DomStage,
    last_time: Option<f64>,
    /// Space bar listener, removed when the game ends
    keydown: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl Game {
    fn new(state: GameState, stage: DomStage) -> Self {
        Self {
            state,
            stage,
            last_time: None,
            keydown: None,
        }
    }

    fn catch(&mut self, id: FishId) {
        let Self { state, stage, .. } = self;
        match state.catch_fish(&id, stage) {
            Ok(points) => log::debug!("+{} (score {})", points, state.score),
            Err(e) => log::warn!("Click on {} rejected: {}", id, e),
        }
    }

    fn pause(&mut self) {
        let Self { state, stage, .. } = self;
        state.pause(stage);
    }

    fn resume(&mut self) {
        let Self { state, stage, .. } = self;
        state.resume(stage);
    }

    fn toggle_pause(&mut self) {
        let Self { state, stage, .. } = self;
        state.toggle_pause(stage);
    }

    /// Advance the simulation to the frame timestamp
    fn update(&mut self, time: f64) {
        let dt = match self.last_time {
            Some(last) => (time - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_time = Some(time);

        let Self { state, stage, .. } = self;
        state.advance(dt, stage);

        if self.state.is_over() {
            self.remove_keydown();
        }
    }

    fn remove_keydown(&mut self) {
        let Some(closure) = self.keydown.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        }
        log::debug!("Keyboard controls released");
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Build the game from the page and start it
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Catch the Fish starting...");

    let window = window()?;
    let document = document()?;

    let config = GameConfig::load();
    let mode = GameMode::from_hash(&window.location().hash().unwrap_or_default());
    let seed = js_sys::Date::now() as u64;

    let stage = DomStage::new(document, &config.ui, &config.timer.classes)?;
    let state = GameState::new(config, mode, seed);
    let game = Rc::new(RefCell::new(Game::new(state, stage)));

    log::info!("Game initialized with seed: {}", seed);

    // Fish clicks arrive from the sprites' own listeners
    {
        let weak = Rc::downgrade(&game);
        game.borrow_mut().stage.set_catch_handler(Rc::new(move |id: FishId| {
            if let Some(game) = weak.upgrade() {
                game.borrow_mut().catch(id);
            }
        }));
    }

    {
        let mut g = game.borrow_mut();
        let Game { state, stage, .. } = &mut *g;
        state.run(stage);
    }

    setup_pause_controls(game.clone())?;
    setup_keyboard(game.clone())?;
    setup_auto_pause(game.clone())?;

    request_animation_frame(game);

    log::info!("Catch the Fish running!");
    Ok(())
}

fn setup_pause_controls(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let document = document()?;
    let ui = game.borrow().state.config.ui.clone();

    if let Some(btn) = document.get_element_by_id(&ui.pause) {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().pause();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    } else {
        log::warn!("No pause control #{}", ui.pause);
    }

    if let Some(btn) = document.get_element_by_id(&ui.resume) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().resume();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    } else {
        log::warn!("No continue control #{}", ui.resume);
    }

    Ok(())
}

fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    let window = window()?;
    let closure = {
        let game = game.clone();
        Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.code() == "Space" {
                event.prevent_default();
                game.borrow_mut().toggle_pause();
            }
        })
    };
    window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    game.borrow_mut().keydown = Some(closure);
    Ok(())
}

/// Pause when the tab is hidden or the window loses focus; the frame loop
/// does not run in a hidden tab, so the clock would jump on return.
fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
    if game.borrow().state.mode != GameMode::Timed {
        return Ok(());
    }

    let window = window()?;
    let document = document()?;

    // Visibility change (tab switch, minimize)
    {
        let game = game.clone();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if !g.state.is_paused() && !g.state.is_over() {
                    g.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
    }

    // Window blur (click outside)
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if !g.state.is_paused() && !g.state.is_over() {
                g.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
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
    game.borrow_mut().update(time);
    request_animation_frame(game);
}
