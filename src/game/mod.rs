//! Game controller: DOM wiring, the animation-frame loop, and the round
//! lifecycle around the recognition service.
//!
//! All mutable state lives in one `thread_local!` cell; event closures and
//! spawned fetches re-enter it through [`with_game`]. Each handler touches the
//! cell exactly once so borrows never nest.

mod canvas;
mod clock;
mod phase;
mod screens;

pub use canvas::{CANVAS_HEIGHT, CANVAS_WIDTH, STROKE_COLOR, STROKE_WIDTH};
pub use clock::{Countdown, Debounce};
pub use phase::{Phase, PhaseMachine};

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, MouseEvent, TouchEvent};

use crate::api::{self, PromptResponse, RecognizeRequest};
use crate::sketch::Sketch;
use crate::verdict;
use canvas::DrawingSurface;
use screens::Hud;

/// Round length shown on the timer.
pub const ROUND_SECS: u32 = 30;
const ROUND_MS: f64 = ROUND_SECS as f64 * 1000.0;
/// Quiet time after the last captured sample before a live guess is requested.
const LIVE_GUESS_QUIET_MS: f64 = 800.0;
/// Don't bother the classifier with fewer samples than this.
const LIVE_GUESS_MIN_POINTS: usize = 8;

struct GameState {
    hud: Hud,
    surface: DrawingSurface,
    machine: PhaseMachine,
    sketch: Sketch,
    countdown: Option<Countdown>,
    debounce: Debounce,
    prompt: Option<PromptResponse>,
    pointer_down: bool,
}

thread_local! {
    static GAME: RefCell<Option<GameState>> = const { RefCell::new(None) };
}

fn with_game<R>(f: impl FnOnce(&mut GameState) -> R) -> Option<R> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Startup ------------------------------------------------------------------

pub fn start() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let hud = Hud::resolve(&doc)?;
    let surface = DrawingSurface::new(hud.canvas.clone())?;
    hud.show(Phase::Start)?;
    hud.set_time_left(ROUND_SECS);
    hud.set_placeholder("Press start to get a prompt.");

    // Element handles are cheap JS references; clone what the wiring needs
    // before the HUD moves into the state cell.
    let start_button = hud.start_button.clone();
    let restart_button = hud.restart_button.clone();
    let clear_button = hud.clear_button.clone();
    let canvas_el = hud.canvas.clone();

    let state = GameState {
        hud,
        surface,
        machine: PhaseMachine::new(),
        sketch: Sketch::new(),
        countdown: None,
        debounce: Debounce::new(LIVE_GUESS_QUIET_MS),
        prompt: None,
        pointer_down: false,
    };
    GAME.with(|cell| cell.replace(Some(state)));

    wire_button(&start_button, on_start_clicked)?;
    wire_button(&restart_button, on_restart_clicked)?;
    wire_button(&clear_button, on_clear_clicked)?;
    wire_canvas(&canvas_el)?;
    start_loop();
    spawn_model_info();

    log::info!("quickdraw-duel: initialized");
    Ok(())
}

fn wire_button(el: &web_sys::HtmlElement, handler: fn()) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut()>::new(move || handler());
    el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    // Listener lives for the page lifetime.
    closure.forget();
    Ok(())
}

fn wire_canvas(canvas: &web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
    let on_down = Closure::<dyn FnMut(MouseEvent)>::new(|e: MouseEvent| {
        press(f64::from(e.offset_x()), f64::from(e.offset_y()));
    });
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_move = Closure::<dyn FnMut(MouseEvent)>::new(|e: MouseEvent| {
        drag(f64::from(e.offset_x()), f64::from(e.offset_y()));
    });
    canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    // mouseup and mouseout both end the stroke, as leaving the canvas can
    // swallow the release.
    for event in ["mouseup", "mouseout"] {
        let on_up = Closure::<dyn FnMut(MouseEvent)>::new(|_: MouseEvent| release());
        canvas.add_event_listener_with_callback(event, on_up.as_ref().unchecked_ref())?;
        on_up.forget();
    }

    let on_touch_start = Closure::<dyn FnMut(TouchEvent)>::new(|e: TouchEvent| {
        e.prevent_default();
        if let Some(t) = e.touches().get(0) {
            press_client(f64::from(t.client_x()), f64::from(t.client_y()));
        }
    });
    canvas.add_event_listener_with_callback("touchstart", on_touch_start.as_ref().unchecked_ref())?;
    on_touch_start.forget();

    let on_touch_move = Closure::<dyn FnMut(TouchEvent)>::new(|e: TouchEvent| {
        e.prevent_default();
        if let Some(t) = e.touches().get(0) {
            drag_client(f64::from(t.client_x()), f64::from(t.client_y()));
        }
    });
    canvas.add_event_listener_with_callback("touchmove", on_touch_move.as_ref().unchecked_ref())?;
    on_touch_move.forget();

    let on_touch_end = Closure::<dyn FnMut(TouchEvent)>::new(|e: TouchEvent| {
        e.prevent_default();
        release();
    });
    canvas.add_event_listener_with_callback("touchend", on_touch_end.as_ref().unchecked_ref())?;
    on_touch_end.forget();

    Ok(())
}

// --- Pointer capture ----------------------------------------------------------

fn press(x: f64, y: f64) {
    with_game(|g| {
        if g.machine.phase() != Phase::Drawing {
            return;
        }
        let now = now_ms();
        g.pointer_down = true;
        g.sketch.begin_stroke(x, y, now);
        g.debounce.note_input(now);
    });
}

fn drag(x: f64, y: f64) {
    with_game(|g| {
        if !g.pointer_down || g.machine.phase() != Phase::Drawing {
            return;
        }
        let now = now_ms();
        if let Some(seg) = g.sketch.extend(x, y, now) {
            g.surface.paint(&seg);
            g.debounce.note_input(now);
        }
    });
}

fn release() {
    with_game(|g| {
        if !g.pointer_down {
            return;
        }
        g.pointer_down = false;
        g.sketch.end_stroke();
        g.debounce.note_input(now_ms());
    });
}

fn press_client(client_x: f64, client_y: f64) {
    with_game(|g| {
        if g.machine.phase() != Phase::Drawing {
            return;
        }
        let (x, y) = g.surface.to_canvas(client_x, client_y);
        let now = now_ms();
        g.pointer_down = true;
        g.sketch.begin_stroke(x, y, now);
        g.debounce.note_input(now);
    });
}

fn drag_client(client_x: f64, client_y: f64) {
    with_game(|g| {
        if !g.pointer_down || g.machine.phase() != Phase::Drawing {
            return;
        }
        let (x, y) = g.surface.to_canvas(client_x, client_y);
        let now = now_ms();
        if let Some(seg) = g.sketch.extend(x, y, now) {
            g.surface.paint(&seg);
            g.debounce.note_input(now);
        }
    });
}

// --- Buttons ------------------------------------------------------------------

fn on_start_clicked() {
    // The phase flips only after the prompt arrives, so a failed fetch leaves
    // the player on the start screen with the error line.
    let idle = with_game(|g| g.machine.phase() == Phase::Start).unwrap_or(false);
    if !idle {
        return;
    }
    with_game(|g| g.hud.set_placeholder("Fetching a prompt…"));
    spawn_local(async {
        match api::fetch_prompt().await {
            Ok(prompt) => {
                with_game(|g| begin_round(g, prompt));
            }
            Err(err) => {
                log::warn!("prompt fetch failed: {err}");
                with_game(|g| g.hud.set_placeholder(&err.user_message()));
            }
        }
    });
}

fn begin_round(g: &mut GameState, prompt: PromptResponse) {
    if !g.machine.start_round() {
        return;
    }
    g.surface.clear();
    g.sketch.clear();
    g.debounce.reset();
    g.countdown = Some(Countdown::new(now_ms(), ROUND_MS));
    g.hud.set_time_left(ROUND_SECS);
    g.hud.set_prompt(&prompt.emoji, &prompt.object);
    g.hud.set_guess("");
    log::info!("round started: draw {} {}", prompt.emoji, prompt.object);
    g.prompt = Some(prompt);
    let _ = g.hud.show(Phase::Drawing);
}

fn on_clear_clicked() {
    with_game(|g| {
        if g.machine.phase() != Phase::Drawing {
            return;
        }
        g.surface.clear();
        g.sketch.clear();
        g.debounce.reset();
        g.pointer_down = false;
        g.hud.set_guess("");
    });
}

fn on_restart_clicked() {
    with_game(|g| {
        if !g.machine.reset() {
            return;
        }
        g.surface.clear();
        g.sketch.clear();
        g.debounce.reset();
        g.countdown = None;
        g.prompt = None;
        g.pointer_down = false;
        g.hud.set_time_left(ROUND_SECS);
        g.hud.set_guess("");
        g.hud.set_placeholder("Press start to get a prompt.");
        let _ = g.hud.show(Phase::Start);
    });
}

// --- Frame loop ---------------------------------------------------------------

fn start_loop() {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        tick(ts);
        if let Some(w) = window() {
            let _ = w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        let _ = w.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

enum TickAction {
    None,
    TimeUp,
    LiveGuess(RecognizeRequest),
}

fn tick(now: f64) {
    let action = with_game(|g| {
        if g.machine.phase() != Phase::Drawing {
            return TickAction::None;
        }
        let Some(countdown) = &g.countdown else {
            return TickAction::None;
        };
        g.hud.set_time_left(countdown.remaining_secs(now));
        if countdown.expired(now) {
            return TickAction::TimeUp;
        }
        if g.debounce.ready(now) && g.sketch.point_count() >= LIVE_GUESS_MIN_POINTS {
            if let Some(prompt) = &g.prompt {
                g.debounce.begin();
                return TickAction::LiveGuess(RecognizeRequest {
                    drawing: g.sketch.to_wire(),
                    object: prompt.object.clone(),
                });
            }
        }
        TickAction::None
    })
    .unwrap_or(TickAction::None);

    match action {
        TickAction::TimeUp => finish_round_time_up(),
        TickAction::LiveGuess(req) => spawn_live_guess(req),
        TickAction::None => {}
    }
}

// --- Recognition --------------------------------------------------------------

fn spawn_model_info() {
    spawn_local(async {
        match api::fetch_model_info().await {
            Ok(info) => {
                let text = verdict::model_summary(&info);
                log::info!("{text}");
                with_game(|g| g.hud.set_model_status(&text));
            }
            Err(err) => {
                log::warn!("model info unavailable: {err}");
                with_game(|g| g.hud.set_model_status(&err.user_message()));
            }
        }
    });
}

fn spawn_live_guess(req: RecognizeRequest) {
    spawn_local(async move {
        let outcome = api::recognize(&req).await;
        // Settle the gate first so a failure cannot wedge live guessing.
        with_game(|g| g.debounce.finish());
        match outcome {
            Ok(resp) => {
                let v = verdict::interpret(&resp);
                let line = verdict::headline(&v, &req.object);
                if verdict::ends_round_early(&v) {
                    finish_round_recognized(&line);
                } else {
                    with_game(|g| {
                        if g.machine.phase() == Phase::Drawing {
                            g.hud.set_guess(&line);
                        }
                    });
                }
            }
            Err(err) => {
                log::warn!("live recognition failed: {err}");
                with_game(|g| {
                    if g.machine.phase() == Phase::Drawing {
                        g.hud.set_guess(&err.user_message());
                    }
                });
            }
        }
    });
}

fn finish_round_recognized(line: &str) {
    with_game(|g| {
        if !g.machine.end_round() {
            return;
        }
        g.pointer_down = false;
        g.sketch.end_stroke();
        g.hud
            .set_guess(&format!("{line} Recognized with time to spare!"));
        let _ = g.hud.show(Phase::PostGame);
        log::info!("round won before the clock ran out");
    });
}

fn finish_round_time_up() {
    let final_request = with_game(|g| {
        if !g.machine.end_round() {
            return None;
        }
        g.pointer_down = false;
        g.sketch.end_stroke();
        let _ = g.hud.show(Phase::PostGame);
        if g.sketch.is_empty() {
            // The backend rejects empty drawings; don't bother calling it.
            g.hud.set_guess("Time's up — you didn't draw anything!");
            return None;
        }
        g.hud.set_guess("Time's up! Asking the model…");
        let prompt = g.prompt.as_ref()?;
        Some(RecognizeRequest {
            drawing: g.sketch.to_wire(),
            object: prompt.object.clone(),
        })
    })
    .flatten();

    if let Some(req) = final_request {
        spawn_local(async move {
            let text = match api::recognize(&req).await {
                Ok(resp) => {
                    let v = verdict::interpret(&resp);
                    let mut line = verdict::headline(&v, &req.object);
                    if let Some(extra) = verdict::breakdown(&resp) {
                        line.push_str(" · ");
                        line.push_str(&extra);
                    }
                    line
                }
                Err(err) => {
                    log::error!("final recognition failed: {err}");
                    err.user_message()
                }
            };
            with_game(|g| g.hud.set_guess(&text));
        });
    }
}
