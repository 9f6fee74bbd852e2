//! オーバーレイ描画
//!
//! 単語ボックスを画像上のキャンバスに描く。状態を持たないので
//! キー入力のたびに呼び出しても問題ない。

use crate::error::GeometryError;
use crate::geometry::{map_canvas, CanvasGeometry, DisplayRect, ImageMetrics};
use crate::ignore::{is_ignored, IgnoreList};
use crate::types::Word;

/// RGBA色（a は 0.0〜1.0）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS色文字列 `rgba(r,g,b,a)`
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }

    /// アルファを 0..=255 に変換
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// ボックスの線と塗り
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub stroke: Rgba,
    pub fill: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub kept: BoxStyle,
    pub ignored: BoxStyle,
    pub line_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            kept: BoxStyle {
                stroke: Rgba::new(0, 160, 0, 0.9),
                fill: Rgba::new(0, 160, 0, 0.10),
            },
            ignored: BoxStyle {
                stroke: Rgba::new(180, 180, 180, 0.9),
                fill: Rgba::new(180, 180, 180, 0.15),
            },
            line_width: 2.0,
        }
    }
}

/// 描画先（2Dラスタキャンバス）
///
/// 座標はすべて表示座標。dpr の補正は `configure` で設定した変換に任せる
pub trait OverlayCanvas {
    /// バッキングストア・レイアウトサイズ・描画変換を設定
    fn configure(&mut self, geometry: &CanvasGeometry);

    fn clear(&mut self, width: f64, height: f64);

    fn stroke_rect(&mut self, rect: &DisplayRect, color: Rgba, line_width: f64);

    fn fill_rect(&mut self, rect: &DisplayRect, color: Rgba);
}

/// 描画結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// 描いたボックス数（無視対象を含む）
    pub drawn: usize,
    /// 描いたうち無視対象（グレー）の数
    pub drawn_ignored: usize,
    /// hide_ignored で描かなかった数
    pub hidden: usize,
}

/// オーバーレイを描画
///
/// 1. キャンバスを画像と同じ箱に合わせてクリア
/// 2. 単語ごとに無視判定し、hide_ignored なら無視対象を飛ばす
/// 3. 入力順に描く（後の単語が上に重なる）
pub fn render_overlay<C: OverlayCanvas + ?Sized>(
    canvas: &mut C,
    metrics: &ImageMetrics,
    words: &[Word],
    ignore_list: &IgnoreList,
    hide_ignored: bool,
    style: &OverlayStyle,
) -> Result<RenderStats, GeometryError> {
    let geometry = map_canvas(metrics)?;

    canvas.configure(&geometry);
    canvas.clear(geometry.css_width, geometry.css_height);

    let mut stats = RenderStats::default();
    for word in words {
        let ignored = is_ignored(&word.text, ignore_list);
        if hide_ignored && ignored {
            stats.hidden += 1;
            continue;
        }

        let rect = geometry.map_word(word);
        let box_style = if ignored { &style.ignored } else { &style.kept };
        canvas.stroke_rect(&rect, box_style.stroke, style.line_width);
        canvas.fill_rect(&rect, box_style.fill);

        stats.drawn += 1;
        if ignored {
            stats.drawn_ignored += 1;
        }
    }

    tracing::trace!(
        drawn = stats.drawn,
        drawn_ignored = stats.drawn_ignored,
        hidden = stats.hidden,
        "overlay rendered"
    );
    Ok(stats)
}

/// 記録された描画命令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect { rect: DisplayRect, color: Rgba, line_width: f64 },
    FillRect { rect: DisplayRect, color: Rgba },
}

/// 描画命令を記録するだけのキャンバス
///
/// clear で記録を消すので、`commands` は常に現在の表示内容と一致する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingCanvas {
    pub geometry: Option<CanvasGeometry>,
    pub commands: Vec<DrawCommand>,
    pub clear_count: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// 描かれている矩形（stroke 単位）
    pub fn stroked_rects(&self) -> Vec<(DisplayRect, Rgba)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::StrokeRect { rect, color, .. } => Some((*rect, *color)),
                DrawCommand::FillRect { .. } => None,
            })
            .collect()
    }
}

impl OverlayCanvas for RecordingCanvas {
    fn configure(&mut self, geometry: &CanvasGeometry) {
        self.geometry = Some(*geometry);
    }

    fn clear(&mut self, _width: f64, _height: f64) {
        self.commands.clear();
        self.clear_count += 1;
    }

    fn stroke_rect(&mut self, rect: &DisplayRect, color: Rgba, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            rect: *rect,
            color,
            line_width,
        });
    }

    fn fill_rect(&mut self, rect: &DisplayRect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect: *rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: f64) -> Word {
        Word {
            text: text.to_string(),
            left,
            top: 10.0,
            width: 40.0,
            height: 20.0,
            ..Default::default()
        }
    }

    fn metrics() -> ImageMetrics {
        ImageMetrics::new((1000.0, 500.0), (500.0, 250.0), 1.0)
    }

    fn sample_words() -> Vec<Word> {
        vec![
            word("Faktura", 0.0),
            word("2024", 100.0),
            word("NIP", 200.0),
            word("2024-01", 300.0),
        ]
    }

    #[test]
    fn test_rgba_to_css() {
        assert_eq!(Rgba::new(0, 160, 0, 0.9).to_css(), "rgba(0,160,0,0.9)");
        assert_eq!(Rgba::new(180, 180, 180, 0.15).to_css(), "rgba(180,180,180,0.15)");
    }

    #[test]
    fn test_rgba_alpha_u8() {
        assert_eq!(Rgba::new(0, 0, 0, 1.0).alpha_u8(), 255);
        assert_eq!(Rgba::new(0, 0, 0, 0.0).alpha_u8(), 0);
        assert_eq!(Rgba::new(0, 0, 0, 2.0).alpha_u8(), 255);
    }

    #[test]
    fn test_styles_distinguishable_by_color() {
        let style = OverlayStyle::default();
        assert_ne!(style.kept.stroke, style.ignored.stroke);
        assert_ne!(style.kept.fill, style.ignored.fill);
        assert_eq!(style.line_width, 2.0);
    }

    #[test]
    fn test_render_all_words_without_ignore() {
        let mut canvas = RecordingCanvas::new();
        let stats = render_overlay(
            &mut canvas,
            &metrics(),
            &sample_words(),
            &IgnoreList::default(),
            false,
            &OverlayStyle::default(),
        )
        .expect("描画失敗");

        assert_eq!(stats, RenderStats { drawn: 4, drawn_ignored: 0, hidden: 0 });
        // stroke → fill の順
        assert_eq!(canvas.commands.len(), 8);
        assert!(matches!(canvas.commands[0], DrawCommand::StrokeRect { line_width, .. } if line_width == 2.0));
        assert!(matches!(canvas.commands[1], DrawCommand::FillRect { .. }));
    }

    #[test]
    fn test_render_maps_to_display_space() {
        let mut canvas = RecordingCanvas::new();
        render_overlay(
            &mut canvas,
            &metrics(),
            &[word("a", 100.0)],
            &IgnoreList::default(),
            false,
            &OverlayStyle::default(),
        )
        .expect("描画失敗");

        let rects = canvas.stroked_rects();
        assert_eq!(rects[0].0, DisplayRect { x: 50.0, y: 5.0, w: 20.0, h: 10.0 });
    }

    #[test]
    fn test_ignored_words_dimmed_when_not_hidden() {
        let style = OverlayStyle::default();
        let mut canvas = RecordingCanvas::new();
        let stats = render_overlay(
            &mut canvas,
            &metrics(),
            &sample_words(),
            &IgnoreList::from_input("2024"),
            false,
            &style,
        )
        .expect("描画失敗");

        assert_eq!(stats, RenderStats { drawn: 4, drawn_ignored: 2, hidden: 0 });
        let colors: Vec<Rgba> = canvas.stroked_rects().into_iter().map(|(_, c)| c).collect();
        assert_eq!(
            colors,
            vec![style.kept.stroke, style.ignored.stroke, style.kept.stroke, style.ignored.stroke]
        );
    }

    #[test]
    fn test_hide_ignored_draws_exactly_kept_words() {
        let words = sample_words();
        let ignore = IgnoreList::from_input("2024\nnip");
        let mut shown = RecordingCanvas::new();
        let mut hidden = RecordingCanvas::new();
        let style = OverlayStyle::default();

        render_overlay(&mut shown, &metrics(), &words, &ignore, false, &style).expect("描画失敗");
        let stats = render_overlay(&mut hidden, &metrics(), &words, &ignore, true, &style).expect("描画失敗");

        let hidden_rects = hidden.stroked_rects();
        assert!(hidden_rects.len() <= shown.stroked_rects().len());
        assert_eq!(stats.hidden, 3);

        let geometry = map_canvas(&metrics()).expect("変換失敗");
        let expected: Vec<DisplayRect> = words
            .iter()
            .filter(|w| !is_ignored(&w.text, &ignore))
            .map(|w| geometry.map_word(w))
            .collect();
        let actual: Vec<DisplayRect> = hidden_rects.into_iter().map(|(r, _)| r).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let words = sample_words();
        let ignore = IgnoreList::from_input("2024");
        let style = OverlayStyle::default();
        let mut canvas = RecordingCanvas::new();

        render_overlay(&mut canvas, &metrics(), &words, &ignore, false, &style).expect("描画失敗");
        let first = canvas.commands.clone();
        render_overlay(&mut canvas, &metrics(), &words, &ignore, false, &style).expect("描画失敗");

        assert_eq!(canvas.commands, first);
        assert_eq!(canvas.clear_count, 2);
    }

    #[test]
    fn test_overlapping_boxes_keep_input_order() {
        let words = vec![word("first", 0.0), word("second", 0.0)];
        let mut canvas = RecordingCanvas::new();
        render_overlay(
            &mut canvas,
            &metrics(),
            &words,
            &IgnoreList::from_input("second"),
            false,
            &OverlayStyle::default(),
        )
        .expect("描画失敗");

        let style = OverlayStyle::default();
        let colors: Vec<Rgba> = canvas.stroked_rects().into_iter().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![style.kept.stroke, style.ignored.stroke]);
    }

    #[test]
    fn test_not_loaded_image_draws_nothing() {
        let mut canvas = RecordingCanvas::new();
        let metrics = ImageMetrics::new((0.0, 0.0), (500.0, 250.0), 1.0);
        let result = render_overlay(
            &mut canvas,
            &metrics,
            &sample_words(),
            &IgnoreList::default(),
            false,
            &OverlayStyle::default(),
        );
        assert_eq!(result, Err(GeometryError::ImageNotLoaded));
        assert!(canvas.geometry.is_none());
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn test_hidden_element_is_noop() {
        let mut canvas = RecordingCanvas::new();
        let metrics = ImageMetrics::new((1000.0, 500.0), (0.0, 0.0), 2.0);
        let result = render_overlay(
            &mut canvas,
            &metrics,
            &sample_words(),
            &IgnoreList::default(),
            false,
            &OverlayStyle::default(),
        );
        assert_eq!(result, Err(GeometryError::NotLaidOut));
        assert_eq!(canvas.clear_count, 0);
    }

    #[test]
    fn test_configure_receives_dpr_geometry() {
        let mut canvas = RecordingCanvas::new();
        let metrics = ImageMetrics::new((1000.0, 500.0), (500.0, 250.0), 2.0);
        render_overlay(&mut canvas, &metrics, &[], &IgnoreList::default(), false, &OverlayStyle::default())
            .expect("描画失敗");

        let geometry = canvas.geometry.expect("configure が呼ばれていない");
        assert_eq!((geometry.backing_width, geometry.backing_height), (1000, 500));
        assert_eq!((geometry.css_width, geometry.css_height), (500.0, 250.0));
    }
}
