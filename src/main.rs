//! YouTube thumbnail fetcher: paste a video link, preview its best thumbnail

// Opening links with the OS default handler
mod browser;
// Command-line configuration
mod config;
// Blocking HTTP client for the thumbnail host
mod downloader;
// Errors surfaced in the status line
mod error;
// Domain types shared by the modules below
mod model;
// Quality fallback probe and image decoding
mod thumbnail;
// URL pattern matching and video id extraction
mod video_url;

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use eframe::{App, Frame, egui};
use egui::{TextureOptions, Visuals};
use once_cell::sync::OnceCell;
use rfd::FileDialog;
use tokio::{
    runtime::Runtime,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::{error, info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use config::{Config, LogFormat};
use downloader::ThumbnailClient;
use error::FetchError;
use model::{LoadedThumbnail, ResolvedThumbnail, VideoId};

const APP_TITLE: &str = "YouTube Thumbnail Fetcher";
const INITIAL_STATUS: &str = "Enter a YouTube URL and click Fetch Thumbnail";

// Worker pool for network and decode jobs, created on first use
static RUNTIME: OnceCell<Runtime> = OnceCell::new();

fn runtime() -> std::io::Result<&'static Runtime> {
    RUNTIME.get_or_try_init(Runtime::new)
}

/// Program entry point: parses flags, sets up logging and launches the window
fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.log_format);

    runtime().context("failed to start worker runtime")?;
    let client = ThumbnailClient::new(config.probe_timeout(), config.download_timeout())
        .context("failed to build HTTP client")?;

    info!(base = config.thumbnail_base(), "starting {APP_TITLE}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());
            Box::new(ThumbnailApp::new(&config, client))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }
}

/// Message from a worker back to the UI thread
enum JobOutcome {
    Resolved(ResolvedThumbnail),
    Loaded(LoadedThumbnail),
    Failed(FetchError),
}

/// Checks the input and derives the video id, in the order the status line reports problems.
fn validate_input(url: &str) -> Result<VideoId, FetchError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::EmptyUrl);
    }
    if !video_url::is_valid_video_url(url) {
        return Err(FetchError::InvalidUrl);
    }
    VideoId::parse(url).ok_or(FetchError::MissingVideoId)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Suggested name in the save dialog, e.g. `dQw4w9WgXcQ_hqdefault.jpg`
fn save_file_name(resolved: &ResolvedThumbnail) -> String {
    format!(
        "{}_{}.jpg",
        resolved.video_id.as_str(),
        resolved.quality.file_stem()
    )
}

fn load_thumbnail(client: &ThumbnailClient, url: &str) -> Result<LoadedThumbnail, FetchError> {
    let bytes = client.download(url)?;
    Ok(thumbnail::decode_thumbnail(bytes)?)
}

/// Application state for the GUI
struct ThumbnailApp {
    /// Input field for the YouTube URL
    url_input: String,
    /// Text shown under the input
    status: String,
    /// Where the thumbnail lives, once probed
    resolved: Option<ResolvedThumbnail>,
    /// Texture for the displayed thumbnail
    texture: Option<egui::TextureHandle>,
    /// Encoded bytes of the displayed thumbnail
    image_bytes: Option<Vec<u8>>,
    /// A worker job is in flight; all actions are disabled meanwhile
    busy: bool,
    thumbnail_base: String,
    client: Arc<ThumbnailClient>,
    outcome_tx: UnboundedSender<JobOutcome>,
    outcome_rx: UnboundedReceiver<JobOutcome>,
}

impl ThumbnailApp {
    fn new(config: &Config, client: ThumbnailClient) -> Self {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        Self {
            url_input: config.url.clone().unwrap_or_default(),
            status: INITIAL_STATUS.to_string(),
            resolved: None,
            texture: None,
            image_bytes: None,
            busy: false,
            thumbnail_base: config.thumbnail_base().to_string(),
            client: Arc::new(client),
            outcome_tx,
            outcome_rx,
        }
    }

    fn can_show(&self) -> bool {
        !self.busy && self.resolved.is_some()
    }

    fn can_save(&self) -> bool {
        !self.busy && self.image_bytes.is_some()
    }

    /// Runs `job` on the blocking pool and wakes the UI when it is done
    fn spawn_job<F>(&mut self, ctx: &egui::Context, job: F)
    where
        F: FnOnce(&ThumbnailClient) -> JobOutcome + Send + 'static,
    {
        let rt = match runtime() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "worker runtime unavailable");
                self.status = format!("Could not start background worker: {e}");
                return;
            }
        };

        self.busy = true;
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        rt.spawn_blocking(move || {
            // A panicking job must still report back, or `busy` never clears
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| job(&client)))
                .unwrap_or_else(|payload| {
                    JobOutcome::Failed(FetchError::Worker(panic_message(payload)))
                });
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    fn fetch_clicked(&mut self, ctx: &egui::Context) {
        let video_id = match validate_input(&self.url_input) {
            Ok(id) => id,
            Err(e) => {
                info!(input = %self.url_input, reason = %e, "rejected input");
                self.status = e.to_string();
                return;
            }
        };

        self.resolved = None;
        self.texture = None;
        self.image_bytes = None;
        self.status = format!("Looking for thumbnails of {video_id}…");

        let base = self.thumbnail_base.clone();
        self.spawn_job(ctx, move |client| {
            JobOutcome::Resolved(thumbnail::resolve_thumbnail(&base, &video_id, |url| {
                client.probe(url)
            }))
        });
    }

    fn show_clicked(&mut self, ctx: &egui::Context) {
        let Some(resolved) = &self.resolved else {
            return;
        };
        let url = resolved.url.clone();

        self.texture = None;
        self.image_bytes = None;
        self.status = format!("Downloading {url}…");

        self.spawn_job(ctx, move |client| match load_thumbnail(client, &url) {
            Ok(loaded) => JobOutcome::Loaded(loaded),
            Err(e) => JobOutcome::Failed(e),
        });
    }

    fn open_clicked(&self) {
        if let Some(resolved) = &self.resolved {
            browser::open_url(&resolved.url);
        }
    }

    fn save_clicked(&mut self) {
        let (Some(resolved), Some(bytes)) = (&self.resolved, &self.image_bytes) else {
            return;
        };
        let file_name = save_file_name(resolved);
        let Some(path) = FileDialog::new()
            .set_file_name(&file_name)
            .add_filter("JPEG image", &["jpg", "jpeg"])
            .save_file()
        else {
            return;
        };

        self.status = match std::fs::write(&path, bytes) {
            Ok(()) => {
                info!(path = %path.display(), "thumbnail saved");
                format!("Saved thumbnail to {}", path.display())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "saving thumbnail failed");
                FetchError::from(e).to_string()
            }
        };
    }

    fn handle_outcome(&mut self, ctx: &egui::Context, outcome: JobOutcome) {
        self.busy = false;
        match outcome {
            JobOutcome::Resolved(resolved) => {
                self.status = format!("Found thumbnail: {}", resolved.url);
                self.resolved = Some(resolved);
            }
            JobOutcome::Loaded(loaded) => {
                self.status = format!(
                    "Successfully displayed thumbnail ({}x{})",
                    loaded.width, loaded.height
                );
                info!(width = loaded.width, height = loaded.height, "thumbnail displayed");
                self.texture =
                    Some(ctx.load_texture("thumbnail", loaded.image, TextureOptions::default()));
                self.image_bytes = Some(loaded.bytes);
            }
            JobOutcome::Failed(e) => {
                warn!(error = %e, "thumbnail job failed");
                self.status = e.to_string();
            }
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for ThumbnailApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.handle_outcome(ctx, outcome);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("YouTube Video Thumbnail Fetcher");
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text("Enter YouTube URL...")
                        .desired_width(400.0),
                );
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(!self.busy, egui::Button::new("Fetch Thumbnail"))
                    .clicked();
                if clicked || (submitted && !self.busy) {
                    self.fetch_clicked(ctx);
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if self.busy {
                    ui.spinner();
                }
                ui.label(self.status.as_str());
            });

            ui.add_space(20.0);
            ui.horizontal(|ui| {
                let ready = self.can_show();
                if ui
                    .add_enabled(ready, egui::Button::new("Show Thumbnail"))
                    .clicked()
                {
                    self.show_clicked(ctx);
                }
                if ui
                    .add_enabled(ready, egui::Button::new("Open in Browser"))
                    .clicked()
                {
                    self.open_clicked();
                }
                if ui
                    .add_enabled(self.can_save(), egui::Button::new("Save Image…"))
                    .clicked()
                {
                    self.save_clicked();
                }
            });

            ui.add_space(20.0);
            if let Some(tex) = &self.texture {
                egui::ScrollArea::both()
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui.image(tex);
                    });
            }
        });
    }
}
