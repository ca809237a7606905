//! HUD wiring. The element ids below are the contract with `index.html`:
//! three screen containers toggled by `display`, the control buttons, the
//! timer / prompt / guess text fields, and the drawing canvas.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use super::phase::Phase;

pub struct Hud {
    start_screen: HtmlElement,
    game_screen: HtmlElement,
    post_game_screen: HtmlElement,
    pub start_button: HtmlElement,
    pub restart_button: HtmlElement,
    pub clear_button: HtmlElement,
    time_left: HtmlElement,
    current_object: HtmlElement,
    object_placeholder: HtmlElement,
    model_guess: HtmlElement,
    /// Start-screen model metadata line; older page layouts omit it.
    model_status: Option<HtmlElement>,
    pub canvas: HtmlCanvasElement,
}

impl Hud {
    pub fn resolve(doc: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            start_screen: required(doc, "start-screen")?,
            game_screen: required(doc, "game-screen")?,
            post_game_screen: required(doc, "post-game-screen")?,
            start_button: required(doc, "start-button")?,
            restart_button: required(doc, "restart-button")?,
            clear_button: required(doc, "clear-button")?,
            time_left: required(doc, "time-left")?,
            current_object: required(doc, "current-object")?,
            object_placeholder: required(doc, "object-placeholder")?,
            model_guess: required(doc, "model-guess")?,
            model_status: optional(doc, "model-status"),
            canvas: required(doc, "drawing-canvas")?,
        })
    }

    /// Make exactly the screen for `phase` visible.
    pub fn show(&self, phase: Phase) -> Result<(), JsValue> {
        let (start, game, post) = match phase {
            Phase::Start => ("block", "none", "none"),
            Phase::Drawing => ("none", "block", "none"),
            Phase::PostGame => ("none", "none", "block"),
        };
        self.start_screen.style().set_property("display", start)?;
        self.game_screen.style().set_property("display", game)?;
        self.post_game_screen.style().set_property("display", post)?;
        Ok(())
    }

    pub fn set_time_left(&self, secs: u32) {
        self.time_left.set_text_content(Some(&secs.to_string()));
    }

    pub fn set_prompt(&self, emoji: &str, object: &str) {
        self.current_object
            .set_text_content(Some(&format!("{emoji} {object}")));
    }

    /// Start-screen status line (prompt fetch progress / errors).
    pub fn set_placeholder(&self, text: &str) {
        self.object_placeholder.set_text_content(Some(text));
    }

    /// The model's guess line, live during the round and final afterwards.
    pub fn set_guess(&self, text: &str) {
        self.model_guess.set_text_content(Some(text));
    }

    pub fn set_model_status(&self, text: &str) {
        match &self.model_status {
            Some(el) => el.set_text_content(Some(text)),
            None => log::debug!("model status (no element): {text}"),
        }
    }
}

fn required<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has an unexpected type")))
}

fn optional(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id).and_then(|el| el.dyn_into().ok())
}
