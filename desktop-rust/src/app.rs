use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use ocr_review_common::table::{filter_items, snippet, NO_TEXT};
use ocr_review_common::{
    render_overlay, GalleryCard, IgnoreList, ImageStatus, Item, LoadTicket, Manifest, OverlayStyle,
    RenderStats, Word,
};

use crate::canvas::{fit_size, image_metrics, EguiCanvas};
use crate::config::ViewerConfig;
use crate::io::{decode_image, load_manifest, resolve_image_path, DecodedImage};
use crate::model::{LoadState, Session};

const CARD_WIDTH: f32 = 560.0;
const THUMB_BOX: f32 = 220.0;

pub struct ViewerApp {
    config: ViewerConfig,
    state: LoadState,
    manifest_path: PathBuf,
    last_session: u64,
    tab: Tab,
    ignore_text: String,
    ignore_list: IgnoreList,
    table_query: String,
    status: String,
    style: OverlayStyle,
    detail_image: Option<DetailImage>,
    detail_stats: Option<RenderStats>,
    thumbs: HashMap<String, LoadedImage>,
    thumb_inflight: HashSet<String>,
    image_tx: Sender<ImageMessage>,
    image_rx: Receiver<ImageMessage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Tab {
    #[default]
    Detail,
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ImageSlot {
    Detail(LoadTicket),
    Thumb(String),
}

/// ワーカースレッドからの画像デコード完了
struct ImageMessage {
    session: u64,
    slot: ImageSlot,
    result: Result<DecodedImage, String>,
}

struct LoadedImage {
    natural: [u32; 2],
    size: [usize; 2],
    texture: egui::TextureHandle,
}

struct DetailImage {
    ticket: LoadTicket,
    image: LoadedImage,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig, ctx: &egui::Context) -> Self {
        let (image_tx, image_rx) = mpsc::channel();
        let mut app = Self {
            ignore_list: IgnoreList::from_input(&config.ignore_phrases),
            ignore_text: config.ignore_phrases.clone(),
            manifest_path: config.manifest_path.clone(),
            config,
            state: LoadState::Failed(String::new()),
            last_session: 0,
            tab: Tab::default(),
            table_query: String::new(),
            status: String::new(),
            style: OverlayStyle::default(),
            detail_image: None,
            detail_stats: None,
            thumbs: HashMap::new(),
            thumb_inflight: HashSet::new(),
            image_tx,
            image_rx,
        };
        let path = app.manifest_path.clone();
        app.open_manifest(ctx, &path);
        app
    }

    /// マニフェストを読み込み、セッションを作り直す
    fn open_manifest(&mut self, ctx: &egui::Context, path: &Path) {
        self.manifest_path = path.to_path_buf();
        self.detail_image = None;
        self.detail_stats = None;
        self.thumbs.clear();
        self.thumb_inflight.clear();

        let manifest = match load_manifest(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::error!("manifest load failed: {err:#}");
                self.status.clear();
                self.state = LoadState::Failed(format!("{err:#}"));
                return;
            }
        };

        self.last_session += 1;
        let (mut session, request) =
            Session::new(self.last_session, manifest, path, self.config.gallery_limit);
        session.detail.set_hide_ignored(self.config.hide_ignored);
        session.gallery.set_hide_ignored(self.config.gallery_hide_ignored);

        tracing::info!(path = %path.display(), items = session.manifest.len(), "manifest loaded");
        self.status = format!("Loaded {} ({} items)", path.display(), session.manifest.len());

        if let Some(request) = request {
            let image_path = resolve_image_path(path, &request.image_rel_path);
            spawn_decode(
                ctx,
                &self.image_tx,
                session.id,
                ImageSlot::Detail(request.ticket),
                image_path,
                self.config.detail_max_side,
            );
        }
        self.state = LoadState::Ready(session);
    }

    fn pick_manifest(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.open_manifest(ctx, &path);
        }
    }

    fn reload_manifest(&mut self, ctx: &egui::Context) {
        let path = self.manifest_path.clone();
        self.open_manifest(ctx, &path);
    }

    fn select_item(&mut self, ctx: &egui::Context, item_id: &str) {
        let LoadState::Ready(session) = &mut self.state else {
            return;
        };
        let Some(item) = session.manifest.item(item_id) else {
            return;
        };
        let request = session.detail.select(item);
        let image_path = resolve_image_path(&session.manifest_path, &request.image_rel_path);
        spawn_decode(
            ctx,
            &self.image_tx,
            session.id,
            ImageSlot::Detail(request.ticket),
            image_path,
            self.config.detail_max_side,
        );
        self.detail_image = None;
        self.detail_stats = None;
        self.tab = Tab::Detail;
    }

    fn on_ignore_changed(&mut self) {
        self.ignore_list = IgnoreList::from_input(&self.ignore_text);
        if let LoadState::Ready(session) = &mut self.state {
            session.gallery.on_ignore_changed();
        }
    }

    /// サムネイルは表示されたカードから順に読み込む
    fn request_thumbnails(&mut self, ctx: &egui::Context, requests: Vec<(String, PathBuf)>) {
        let LoadState::Ready(session) = &self.state else {
            return;
        };
        for (item_id, path) in requests {
            if !self.thumb_inflight.insert(item_id.clone()) {
                continue;
            }
            spawn_decode(
                ctx,
                &self.image_tx,
                session.id,
                ImageSlot::Thumb(item_id),
                path,
                self.config.thumbnail_max_side,
            );
        }
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        let LoadState::Ready(session) = &mut self.state else {
            while self.image_rx.try_recv().is_ok() {}
            return;
        };

        while let Ok(msg) = self.image_rx.try_recv() {
            if msg.session != session.id {
                continue;
            }
            match msg.slot {
                ImageSlot::Detail(ticket) => match msg.result {
                    Ok(decoded) => {
                        if session.detail.on_image_loaded(ticket).is_some() {
                            let image = upload_texture(ctx, &format!("detail-{ticket}"), &decoded);
                            self.detail_image = Some(DetailImage { ticket, image });
                        }
                    }
                    Err(err) => {
                        if session.detail.is_current(ticket) {
                            tracing::warn!("detail image failed: {err}");
                            self.status = format!("Image load failed: {err}");
                        }
                        session.detail.on_image_failed(ticket);
                    }
                },
                ImageSlot::Thumb(item_id) => {
                    self.thumb_inflight.remove(&item_id);
                    let Some(card) = session.gallery.card_mut(&item_id) else {
                        continue;
                    };
                    match msg.result {
                        Ok(decoded) => {
                            let image = upload_texture(ctx, &format!("thumb-{item_id}"), &decoded);
                            self.thumbs.insert(item_id, image);
                            card.on_image_loaded();
                        }
                        Err(err) => {
                            tracing::warn!(item_id = %item_id, "thumbnail failed: {err}");
                            card.on_image_failed();
                        }
                    }
                }
            }
        }
    }

    fn render_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Manifest…").clicked() {
                    self.pick_manifest(ui.ctx());
                    ui.close_menu();
                }
                if ui.button("Reload").clicked() {
                    self.reload_manifest(ui.ctx());
                    ui.close_menu();
                }
            });

            ui.separator();
            if !self.status.is_empty() {
                ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
            }
        });
    }

    /// マニフェストがないときはこの画面だけを出す
    fn render_fatal(&mut self, ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Manifest unavailable");
            ui.add_space(8.0);
            ui.label(RichText::new(message).color(Color32::from_rgb(230, 120, 120)));
            ui.add_space(16.0);
            ui.horizontal(|ui| {
                if ui.button("Retry").clicked() {
                    self.reload_manifest(ui.ctx());
                }
                if ui.button("Open Manifest…").clicked() {
                    self.pick_manifest(ui.ctx());
                }
            });
        });
    }

    fn render_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Ignore phrases");
        ui.label(RichText::new("One phrase per line").color(Color32::from_gray(150)).size(11.0));
        let response = ui.add(
            egui::TextEdit::multiline(&mut self.ignore_text)
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            self.on_ignore_changed();
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Filter");
            ui.text_edit_singleline(&mut self.table_query);
        });
        ui.separator();

        let LoadState::Ready(session) = &self.state else {
            return;
        };
        let rows = filter_items(&session.manifest.items, &self.table_query);
        ui.label(format!("{} / {} items", rows.len(), session.manifest.len()));

        let current = session.detail.current_item_id();
        let snippet_chars = self.config.table_snippet_chars;
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("results_table")
                    .striped(true)
                    .num_columns(2)
                    .show(ui, |ui| {
                        for item in rows {
                            let selected = current == Some(item.id.as_str());
                            if ui.selectable_label(selected, &item.file_name).clicked() {
                                clicked = Some(item.id.clone());
                            }
                            ui.label(RichText::new(snippet(&item.full_text, snippet_chars)).size(12.0));
                            ui.end_row();
                        }
                    });
            });

        if let Some(item_id) = clicked {
            self.select_item(ui.ctx(), &item_id);
        }
    }

    fn render_detail(&mut self, ui: &mut egui::Ui) {
        let LoadState::Ready(session) = &mut self.state else {
            return;
        };

        let mut hide = session.detail.hide_ignored();
        if ui.checkbox(&mut hide, "Hide ignored").changed() {
            session.detail.set_hide_ignored(hide);
        }

        let Some(item) = session.current_item() else {
            ui.label("No items in manifest.");
            return;
        };
        ui.label(RichText::new(&item.file_name).strong());
        ui.separator();

        let detail = &session.detail;
        let image = self
            .detail_image
            .as_ref()
            .filter(|image| detail.is_current(image.ticket));
        let ignore_list = &self.ignore_list;
        let style = &self.style;
        let stats = &mut self.detail_stats;

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            match (detail.redraw_target(), image) {
                (Some(_), Some(image)) => {
                    let size = fit_size(image.image.size, ui.available_width(), f32::INFINITY);
                    let response = ui.add(egui::Image::new(&image.image.texture).fit_to_exact_size(size));
                    *stats = paint_overlay(
                        ui,
                        response.rect,
                        image.image.natural,
                        &item.words,
                        ignore_list,
                        detail.hide_ignored(),
                        style,
                    );
                }
                _ if detail.image_status() == Some(ImageStatus::Failed) => {
                    ui.label(RichText::new("Image unavailable").color(Color32::from_rgb(230, 120, 120)));
                }
                _ => {
                    ui.label("Loading...");
                }
            }

            let ui = &mut columns[1];
            if let Some(stats) = stats {
                ui.label(
                    RichText::new(format!(
                        "{} boxes ({} ignored shown, {} hidden)",
                        stats.drawn, stats.drawn_ignored, stats.hidden
                    ))
                    .color(Color32::from_gray(150))
                    .size(11.0),
                );
            }
            ui.label(RichText::new("Full text").strong());
            egui::ScrollArea::vertical()
                .id_source("full_text")
                .show(ui, |ui| {
                    let text = if item.full_text.trim().is_empty() { NO_TEXT } else { item.full_text.as_str() };
                    ui.label(text);
                });
        });
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let LoadState::Ready(session) = &mut self.state else {
            return;
        };

        let mut hide = session.gallery.hide_ignored();
        if ui.checkbox(&mut hide, "Hide ignored").changed() {
            session.gallery.set_hide_ignored(hide);
        }
        let total = session.manifest.len();
        if session.gallery.len() < total {
            ui.label(format!("Showing {}/{} items", session.gallery.len(), total));
        }
        ui.separator();

        let Session {
            manifest,
            manifest_path,
            gallery,
            ..
        } = session;
        let manifest: &Manifest = manifest;
        let manifest_path = manifest_path.as_path();
        let hide_ignored = gallery.hide_ignored();
        let snippet_chars = self.config.gallery_snippet_chars;
        let thumbs = &self.thumbs;
        let view = CardView {
            ignore_list: &self.ignore_list,
            hide_ignored,
            style: &self.style,
            snippet_chars,
        };
        let mut requests = Vec::new();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for card in gallery.cards_mut() {
                        let Some(item) = manifest.item(card.item_id()) else {
                            continue;
                        };
                        let thumb = thumbs.get(&item.id);
                        if thumb.is_none() && card.image_status() == ImageStatus::Loading {
                            requests.push((item.id.clone(), resolve_image_path(manifest_path, &item.image_rel_path)));
                        }
                        render_card(ui, card, item, thumb, &view);
                        ui.add_space(8.0);
                    }
                });
            });

        self.request_thumbnails(&ctx, requests);
    }
}

/// カード描画に共通の値
struct CardView<'a> {
    ignore_list: &'a IgnoreList,
    hide_ignored: bool,
    style: &'a OverlayStyle,
    snippet_chars: usize,
}

fn render_card(
    ui: &mut egui::Ui,
    card: &mut GalleryCard,
    item: &Item,
    thumb: Option<&LoadedImage>,
    view: &CardView<'_>,
) {
    let frame = egui::Frame::none()
        .fill(if card.is_expanded() { Color32::from_rgb(31, 35, 48) } else { Color32::from_rgb(24, 28, 40) })
        .stroke(egui::Stroke::new(1.0, Color32::from_gray(40)))
        .rounding(egui::Rounding::same(10.0))
        .inner_margin(egui::Margin::same(10.0));

    let inner = frame.show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.label(RichText::new(&item.file_name).strong());
        ui.horizontal_top(|ui| {
            let thumb_box = egui::vec2(THUMB_BOX, THUMB_BOX);
            match thumb {
                Some(thumb) => {
                    let size = fit_size(thumb.size, thumb_box.x, thumb_box.y);
                    let response = ui.add(egui::Image::new(&thumb.texture).fit_to_exact_size(size));
                    let rect = response.rect;
                    let (w, h) = (rect.width() as f64, rect.height() as f64);
                    // 即時モードは毎フレーム描き直すので、保留中の再描画要求はこのフレームで消化する
                    card.take_redraw(w, h);
                    if card.is_drawable(w, h) {
                        paint_overlay(
                            ui,
                            rect,
                            thumb.natural,
                            &item.words,
                            view.ignore_list,
                            view.hide_ignored,
                            view.style,
                        );
                    }
                }
                None => {
                    let label = if card.image_status() == ImageStatus::Failed { "No image" } else { "Loading..." };
                    ui.allocate_ui_with_layout(
                        thumb_box,
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(label);
                        },
                    );
                }
            }

            ui.add_space(8.0);
            ui.vertical(|ui| {
                ui.label(RichText::new("OCR:").color(Color32::from_gray(150)).size(11.0));
                ui.label(RichText::new(card.text(item, view.snippet_chars)).size(12.0));
            });
        });
    });

    // egui はドラッグ（テキスト選択）をクリックとして報告しない
    let response = inner.response.interact(egui::Sense::click());
    if response.clicked() {
        card.toggle_expanded(false);
    }
}

fn paint_overlay(
    ui: &egui::Ui,
    rect: egui::Rect,
    natural: [u32; 2],
    words: &[Word],
    ignore_list: &IgnoreList,
    hide_ignored: bool,
    style: &OverlayStyle,
) -> Option<RenderStats> {
    let painter = ui.painter_at(rect);
    let mut canvas = EguiCanvas::new(&painter, rect);
    let metrics = image_metrics(natural, rect, ui.ctx().pixels_per_point());
    match render_overlay(&mut canvas, &metrics, words, ignore_list, hide_ignored, style) {
        Ok(stats) => Some(stats),
        Err(err) => {
            tracing::debug!("overlay skipped: {err}");
            None
        }
    }
}

fn upload_texture(ctx: &egui::Context, name: &str, decoded: &DecodedImage) -> LoadedImage {
    let color_image = egui::ColorImage::from_rgba_unmultiplied(decoded.size, &decoded.pixels);
    let texture = ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR);
    LoadedImage {
        natural: decoded.natural,
        size: decoded.size,
        texture,
    }
}

/// 画像デコードをワーカースレッドで行い、完了をチャネルで UI スレッドへ返す
fn spawn_decode(
    ctx: &egui::Context,
    sender: &Sender<ImageMessage>,
    session: u64,
    slot: ImageSlot,
    path: PathBuf,
    max_side: u32,
) {
    let ctx = ctx.clone();
    let sender = sender.clone();
    std::thread::spawn(move || {
        let result = decode_image(&path, max_side).map_err(|err| format!("{err:#}"));
        let _ = sender.send(ImageMessage { session, slot, result });
        ctx.request_repaint();
    });
}

/// OCRテキスト（CJK等）用のフォールバックフォント
pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    let Some(data) = candidates.iter().find_map(|path| std::fs::read(path).ok()) else {
        return;
    };
    fonts.font_data.insert("ocr_fallback".to_string(), FontData::from_owned(data));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("ocr_fallback".to_string());
    }
    ctx.set_fonts(fonts);
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_menu(ui);
        });

        if let LoadState::Failed(message) = &self.state {
            let message = message.clone();
            egui::CentralPanel::default().show(ctx, |ui| {
                self.render_fatal(ui, &message);
            });
            return;
        }

        egui::SidePanel::left("results")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                self.render_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Detail, "Detail");
                ui.selectable_value(&mut self.tab, Tab::Gallery, "Gallery");
            });
            ui.separator();
            match self.tab {
                Tab::Detail => self.render_detail(ui),
                Tab::Gallery => self.render_gallery(ui),
            }
        });
    }
}
