//! `<canvas>` へのオーバーレイ描画

use gloo::console;
use ocr_review_common::geometry::{CanvasGeometry, DisplayRect, ImageMetrics};
use ocr_review_common::{render_overlay, IgnoreList, OverlayCanvas, OverlayStyle, RenderStats, Rgba, Word};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::api::manifest::js_message;

/// CanvasRenderingContext2d への描画
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl OverlayCanvas for WebCanvas {
    fn configure(&mut self, geometry: &CanvasGeometry) {
        // バッキングストアは物理ピクセル、CSSサイズは表示サイズ
        self.canvas.set_width(geometry.backing_width);
        self.canvas.set_height(geometry.backing_height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", geometry.css_width));
        let _ = style.set_property("height", &format!("{}px", geometry.css_height));

        let dpr = geometry.dpr;
        if let Err(e) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            console::error!("setTransform failed:", js_message(&e));
        }
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_rect(&mut self, rect: &DisplayRect, color: Rgba, line_width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn fill_rect(&mut self, rect: &DisplayRect, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
}

/// `<img>` の元サイズと表示サイズ
pub fn measure(img: &HtmlImageElement) -> ImageMetrics {
    ImageMetrics::new(
        (img.natural_width() as f64, img.natural_height() as f64),
        (img.client_width() as f64, img.client_height() as f64),
        device_pixel_ratio(),
    )
}

/// 画像に重ねたキャンバスへ単語ボックスを描く
pub fn draw_overlay(
    img: &HtmlImageElement,
    canvas: HtmlCanvasElement,
    words: &[Word],
    ignore_list: &IgnoreList,
    hide_ignored: bool,
) -> Option<RenderStats> {
    let Some(mut target) = WebCanvas::new(canvas) else {
        console::error!("2d context unavailable");
        return None;
    };
    let metrics = measure(img);
    render_overlay(&mut target, &metrics, words, ignore_list, hide_ignored, &OverlayStyle::default()).ok()
}
