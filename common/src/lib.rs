//! OCR Review Common Library
//!
//! デスクトップ(egui)とWeb(WASM)で共有される型と描画ロジック

pub mod types;
pub mod error;
pub mod ignore;
pub mod geometry;
pub mod overlay;
pub mod table;
pub mod view;

pub use types::{Item, Manifest, Word};
pub use error::{Error, GeometryError, Result};
pub use ignore::{is_ignored, IgnoreList};
pub use geometry::{map_canvas, CanvasGeometry, DisplayRect, ImageMetrics};
pub use overlay::{render_overlay, OverlayCanvas, OverlayStyle, RecordingCanvas, RenderStats, Rgba};
pub use table::{filter_items, snippet};
pub use view::{DetailView, GalleryCard, GalleryView, ImageRequest, ImageStatus, LoadTicket};
