//! 座標変換
//!
//! 元画像（natural）のピクセル座標から表示座標への変換と、
//! devicePixelRatio を考慮したキャンバスサイズを計算する。

use crate::error::GeometryError;
use crate::types::Word;

/// 画像要素の寸法
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMetrics {
    pub natural_width: f64,
    pub natural_height: f64,
    pub displayed_width: f64,
    pub displayed_height: f64,
    pub device_pixel_ratio: f64,
}

/// 表示座標の矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// オーバーレイ用キャンバスの配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub scale_x: f64,
    pub scale_y: f64,
    /// バッキングストア（物理ピクセル）
    pub backing_width: u32,
    pub backing_height: u32,
    /// レイアウト上のサイズ（画像と同じ箱）
    pub css_width: f64,
    pub css_height: f64,
    /// 描画変換の倍率。以降の描画は表示座標で指定する
    pub dpr: f64,
}

impl ImageMetrics {
    pub fn new(natural: (f64, f64), displayed: (f64, f64), device_pixel_ratio: f64) -> Self {
        Self {
            natural_width: natural.0,
            natural_height: natural.1,
            displayed_width: displayed.0,
            displayed_height: displayed.1,
            device_pixel_ratio,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.natural_width > 0.0 && self.natural_height > 0.0
    }

    pub fn is_laid_out(&self) -> bool {
        self.displayed_width > 0.0 && self.displayed_height > 0.0
    }
}

/// 寸法からキャンバス配置を計算
///
/// 画像未読込（natural が 0）と未レイアウト（表示サイズが 0）は描画しない
pub fn map_canvas(metrics: &ImageMetrics) -> Result<CanvasGeometry, GeometryError> {
    if !metrics.is_loaded() {
        return Err(GeometryError::ImageNotLoaded);
    }
    if !metrics.is_laid_out() {
        return Err(GeometryError::NotLaidOut);
    }

    let dpr = effective_dpr(metrics.device_pixel_ratio);
    Ok(CanvasGeometry {
        scale_x: metrics.displayed_width / metrics.natural_width,
        scale_y: metrics.displayed_height / metrics.natural_height,
        backing_width: (metrics.displayed_width * dpr).round() as u32,
        backing_height: (metrics.displayed_height * dpr).round() as u32,
        css_width: metrics.displayed_width,
        css_height: metrics.displayed_height,
        dpr,
    })
}

/// 0・負数・NaN は 1 として扱う
pub fn effective_dpr(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    }
}

impl CanvasGeometry {
    /// 単語ボックスを表示座標へ変換
    pub fn map_word(&self, word: &Word) -> DisplayRect {
        DisplayRect {
            x: word.left * self.scale_x,
            y: word.top * self.scale_y,
            w: word.width * self.scale_x,
            h: word.height * self.scale_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(left: f64, top: f64, width: f64, height: f64) -> Word {
        Word {
            text: "w".to_string(),
            left,
            top,
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_scale_half() {
        let metrics = ImageMetrics::new((1000.0, 500.0), (500.0, 250.0), 1.0);
        let geometry = map_canvas(&metrics).expect("変換失敗");
        assert_eq!(geometry.scale_x, 0.5);
        assert_eq!(geometry.scale_y, 0.5);

        let rect = geometry.map_word(&word(100.0, 100.0, 50.0, 20.0));
        assert_eq!(rect, DisplayRect { x: 50.0, y: 50.0, w: 25.0, h: 10.0 });
    }

    #[test]
    fn test_non_uniform_scale() {
        let metrics = ImageMetrics::new((400.0, 200.0), (200.0, 200.0), 1.0);
        let geometry = map_canvas(&metrics).expect("変換失敗");
        let rect = geometry.map_word(&word(40.0, 40.0, 20.0, 20.0));
        assert_eq!(rect, DisplayRect { x: 20.0, y: 40.0, w: 10.0, h: 20.0 });
    }

    #[test]
    fn test_dpr_two_doubles_backing_store() {
        let metrics = ImageMetrics::new((1000.0, 500.0), (500.0, 250.0), 2.0);
        let geometry = map_canvas(&metrics).expect("変換失敗");
        assert_eq!((geometry.backing_width, geometry.backing_height), (1000, 500));
        assert_eq!((geometry.css_width, geometry.css_height), (500.0, 250.0));
        assert_eq!(geometry.dpr, 2.0);
        // スケールは表示座標基準のまま
        assert_eq!(geometry.scale_x, 0.5);
    }

    #[test]
    fn test_fractional_dpr_rounds_backing_store() {
        let metrics = ImageMetrics::new((640.0, 480.0), (333.0, 250.0), 1.5);
        let geometry = map_canvas(&metrics).expect("変換失敗");
        assert_eq!(geometry.backing_width, 500); // 499.5 -> 500
        assert_eq!(geometry.backing_height, 375);
    }

    #[test]
    fn test_invalid_dpr_falls_back_to_one() {
        for dpr in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let metrics = ImageMetrics::new((100.0, 100.0), (50.0, 50.0), dpr);
            let geometry = map_canvas(&metrics).expect("変換失敗");
            assert_eq!(geometry.dpr, 1.0);
            assert_eq!(geometry.backing_width, 50);
        }
    }

    #[test]
    fn test_not_loaded() {
        let metrics = ImageMetrics::new((0.0, 0.0), (500.0, 250.0), 1.0);
        assert_eq!(map_canvas(&metrics), Err(GeometryError::ImageNotLoaded));
        let metrics = ImageMetrics::new((100.0, 0.0), (500.0, 250.0), 1.0);
        assert_eq!(map_canvas(&metrics), Err(GeometryError::ImageNotLoaded));
    }

    #[test]
    fn test_not_laid_out() {
        let metrics = ImageMetrics::new((1000.0, 500.0), (0.0, 0.0), 1.0);
        assert_eq!(map_canvas(&metrics), Err(GeometryError::NotLaidOut));
        let metrics = ImageMetrics::new((1000.0, 500.0), (500.0, 0.0), 2.0);
        assert_eq!(map_canvas(&metrics), Err(GeometryError::NotLaidOut));
    }
}
