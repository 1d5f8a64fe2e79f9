mod input;
mod texture_cache;
mod workers;

use memoir_audio::MicCapture;
use memoir_state::catalog::Catalog;
use memoir_state::config::{self, Settings};
use memoir_state::gesture::HitRegions;
use memoir_state::strip::StripMetrics;
use memoir_state::{CarouselEngine, EngineEvent};
use memoir_ui::constants::{HEADER_HEIGHT, STRIP_HEIGHT, VOICE_BARS};
use memoir_ui::overlay::{self, OverlayAction};
use memoir_ui::{carousel, date_strip, theme};

use input::PointerTranslator;
use texture_cache::TextureCache;
use workers::image_worker::{spawn_image_worker, ImageWorkerChannels};

pub struct MemoirApp {
    engine: Option<CarouselEngine>,
    startup_error: Option<String>,
    textures: TextureCache,
    images: ImageWorkerChannels,
    pointer: PointerTranslator,
    mic: Option<MicCapture>,
    levels: Vec<f32>,
}

impl MemoirApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        theme::apply_theme(&cc.egui_ctx);
        let now_ms = cc.egui_ctx.input(|i| i.time) * 1_000.0;
        let today = chrono::Local::now().date_naive();

        let settings = config::load();
        if config::config_path().is_some_and(|path| !path.exists()) {
            // First run: leave an editable settings file behind.
            if let Err(err) = config::save(&settings) {
                log::warn!("could not write default settings: {err}");
            }
        }
        let catalog = Catalog::load_or_sample(settings.catalog_path.as_deref());
        let engine = CarouselEngine::new(settings, catalog.clone(), today, now_ms).or_else(|err| {
            log::warn!("settings rejected ({err}); starting with defaults");
            CarouselEngine::new(Settings::default(), catalog, today, now_ms)
        });

        let images = spawn_image_worker();
        let mut textures = TextureCache::default();
        let (engine, startup_error) = match engine {
            Ok(engine) => {
                textures.request_all(engine.catalog(), engine.center_index(), &images.req_tx);
                (Some(engine), None)
            }
            Err(err) => {
                log::error!("could not start: {err}");
                (None, Some(err.to_string()))
            }
        };

        Self {
            engine,
            startup_error,
            textures,
            images,
            pointer: PointerTranslator::default(),
            mic: None,
            levels: Vec::new(),
        }
    }

    fn poll_images(&mut self, ctx: &egui::Context) {
        let mut received = false;
        while let Ok(decoded) = self.images.result_rx.try_recv() {
            received |= self.textures.receive(ctx, decoded);
        }
        if received {
            ctx.request_repaint();
        }
    }

    fn feed_input(&mut self, ctx: &egui::Context, now_ms: f64) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let events = ctx.input(|i| i.events.clone());
        for event in self.pointer.translate(&events) {
            engine.pointer(event, now_ms);
        }
        engine.frame(now_ms);
    }

    fn apply_engine_events(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        for event in engine.drain_events() {
            match event {
                EngineEvent::Reveal { index, detail } => {
                    log::info!("revealing memory {index} ({})", detail.as_deref().unwrap_or("no detail"));
                }
                EngineEvent::VoiceModeChanged(true) => match MicCapture::open(VOICE_BARS) {
                    Ok(mic) => {
                        self.mic = Some(mic);
                        engine.set_voice_available(true);
                    }
                    Err(err) => {
                        log::warn!("voice input unavailable: {err}");
                        engine.set_voice_available(false);
                    }
                },
                EngineEvent::VoiceModeChanged(false) => {
                    self.mic = None;
                    self.levels.clear();
                    engine.set_voice_available(false);
                }
            }
        }
    }

    fn poll_levels(&mut self) {
        if let Some(mic) = self.mic.as_mut() {
            self.levels.clear();
            self.levels.extend(mic.poll().iter());
        }
    }

    fn draw(&mut self, ctx: &egui::Context, now_ms: f64) {
        let Some(engine) = self.engine.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.colored_label(
                        theme::ACCENT,
                        self.startup_error.as_deref().unwrap_or("Nothing to show"),
                    );
                });
            });
            return;
        };

        if engine.detail().is_none() {
            egui::TopBottomPanel::top("header")
                .exact_height(HEADER_HEIGHT)
                .show(ctx, |ui| overlay::header(ui, engine));
        }

        let mut timeline = None;
        let mut viewport_width = 0.0;
        egui::TopBottomPanel::bottom("date_strip")
            .exact_height(STRIP_HEIGHT)
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                viewport_width = ui.max_rect().width();
                if engine.voice().active {
                    overlay::voice_indicator(ui, engine.voice(), &self.levels, STRIP_HEIGHT);
                } else {
                    timeline = Some(date_strip::date_strip(ui, engine));
                }
            });

        let mut cards = [None; 3];
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(theme::BG_DARK))
            .show(ctx, |ui| {
                cards = carousel::carousel(ui, engine, &self.textures, now_ms);
            });

        if overlay::launch_screen(ctx, engine, now_ms) == OverlayAction::Launch {
            engine.launch(now_ms);
        }
        if overlay::detail_view(ctx, engine, &self.textures) == OverlayAction::CloseDetail {
            engine.close_detail();
        }

        engine.set_layout(
            HitRegions { cards, timeline },
            StripMetrics::default(),
            viewport_width,
        );
    }
}

impl eframe::App for MemoirApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now_ms = ctx.input(|i| i.time) * 1_000.0;

        self.poll_images(ctx);
        self.feed_input(ctx, now_ms);
        self.apply_engine_events();
        self.poll_levels();
        self.draw(ctx, now_ms);

        ctx.request_repaint();
    }
}
