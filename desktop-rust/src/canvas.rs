use eframe::egui::{self, Color32, Painter, Rect, Stroke};
use ocr_review_common::geometry::{CanvasGeometry, DisplayRect, ImageMetrics};
use ocr_review_common::{OverlayCanvas, Rgba};

/// egui の Painter に描くオーバーレイ
///
/// egui は論理ポイントで描き、物理ピクセルへの変換（pixels_per_point）は
/// テッセレータが行うので、configure では画像の原点だけ覚える
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    image_rect: Rect,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a Painter, image_rect: Rect) -> Self {
        Self { painter, image_rect }
    }

    fn to_screen(&self, rect: &DisplayRect) -> Rect {
        let min = self.image_rect.min + egui::vec2(rect.x as f32, rect.y as f32);
        Rect::from_min_size(min, egui::vec2(rect.w as f32, rect.h as f32))
    }
}

impl OverlayCanvas for EguiCanvas<'_> {
    fn configure(&mut self, geometry: &CanvasGeometry) {
        self.image_rect = Rect::from_min_size(
            self.image_rect.min,
            egui::vec2(geometry.css_width as f32, geometry.css_height as f32),
        );
    }

    // 即時モードなので前フレームの描画は残らない
    fn clear(&mut self, _width: f64, _height: f64) {}

    fn stroke_rect(&mut self, rect: &DisplayRect, color: Rgba, line_width: f64) {
        self.painter.rect_stroke(
            self.to_screen(rect),
            0.0,
            Stroke::new(line_width as f32, to_color32(color)),
        );
    }

    fn fill_rect(&mut self, rect: &DisplayRect, color: Rgba) {
        self.painter.rect_filled(self.to_screen(rect), 0.0, to_color32(color));
    }
}

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.alpha_u8())
}

/// 表示中の画像の寸法
pub fn image_metrics(natural: [u32; 2], displayed: Rect, pixels_per_point: f32) -> ImageMetrics {
    ImageMetrics::new(
        (natural[0] as f64, natural[1] as f64),
        (displayed.width() as f64, displayed.height() as f64),
        pixels_per_point as f64,
    )
}

/// 幅 max_width に収まる表示サイズ（拡大はしない）
pub fn fit_size(texture_size: [usize; 2], max_width: f32, max_height: f32) -> egui::Vec2 {
    let w = texture_size[0].max(1) as f32;
    let h = texture_size[1].max(1) as f32;
    let scale = (max_width / w).min(max_height / h).min(1.0).max(0.0);
    egui::vec2(w * scale, h * scale)
}
