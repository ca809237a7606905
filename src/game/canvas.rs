//! Drawing surface: incremental stroke painting on the 2d canvas context.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sketch::Segment;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 400;
pub const STROKE_WIDTH: f64 = 5.0;
pub const STROKE_COLOR: &str = "#000";

pub struct DrawingSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DrawingSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(CANVAS_WIDTH);
        canvas.set_height(CANVAS_HEIGHT);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        ctx.set_line_width(STROKE_WIDTH);
        ctx.set_line_cap("round");
        ctx.set_stroke_style_str(STROKE_COLOR);
        Ok(Self { canvas, ctx })
    }

    /// Paint one captured increment.
    pub fn paint(&self, seg: &Segment) {
        self.ctx.begin_path();
        self.ctx.move_to(seg.from.0, seg.from.1);
        self.ctx.line_to(seg.to.0, seg.to.1);
        self.ctx.stroke();
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }

    /// Map client (viewport) coordinates into canvas space. Touch events only
    /// report client coordinates, unlike mouse offsetX/offsetY.
    pub fn to_canvas(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (client_x - rect.left(), client_y - rect.top())
    }
}
