use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use egui::TextureOptions;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError as BroadcastTryRecvError;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::analysis::{AnalysisHandle, GeminiClient};
use crate::app::views::{self, CameraAction};
use crate::app::{AppEvent, AppState, AppView};
use crate::capture::{self, CameraFeed, CameraFrame, EncodedImage};
use crate::config::Settings;
use crate::error::{AppError, CaptureError};

/// The single-window application shell: owns the state machine, the
/// analysis bridge and the camera feed, and drives one render per frame.
pub struct PoseGenieApp {
    state: AppState,
    settings: Settings,
    analysis: AnalysisHandle,
    camera: Option<CameraFeed>,
    frame_rx: Option<broadcast::Receiver<CameraFrame>>,
    cached_frame: Option<CameraFrame>,
    texture: Option<egui::TextureHandle>,
    /// Set after a failed camera open so we do not hammer the device every
    /// frame; cleared when the Camera screen is re-entered.
    camera_failed: bool,
    capture_notice: Option<String>,
    upload_path: String,
    upload_tx: mpsc::Sender<Result<EncodedImage, CaptureError>>,
    upload_rx: mpsc::Receiver<Result<EncodedImage, CaptureError>>,
}

impl PoseGenieApp {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let client = GeminiClient::from_settings(&settings)?;
        let (upload_tx, upload_rx) = mpsc::channel(4);

        Ok(Self {
            state: AppState::default(),
            settings,
            analysis: AnalysisHandle::new(Arc::new(client)),
            camera: None,
            frame_rx: None,
            cached_frame: None,
            texture: None,
            camera_failed: false,
            capture_notice: None,
            upload_path: String::new(),
            upload_rx,
            upload_tx,
        })
    }

    /// Opens the native window and blocks until it closes. Must run inside
    /// a tokio runtime; background tasks are spawned onto it.
    pub fn start_gui(settings: Settings) -> Result<(), AppError> {
        let app = Self::new(settings)?;

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(egui::vec2(430.0, 860.0))
                .with_title("PoseGenie"),
            ..Default::default()
        };

        eframe::run_native("PoseGenie", options, Box::new(move |_cc| Ok(Box::new(app))))
            .map_err(|e| AppError::Ui(e.to_string()))
    }

    /// Hands the image to the analysis bridge and reports the capture to
    /// the state machine in the same UI frame (Loading is entered before
    /// the async call resolves).
    fn begin_analysis(&mut self, image: EncodedImage, events: &mut Vec<AppEvent>) {
        self.capture_notice = None;
        let token = self.analysis.submit(image.clone());
        events.push(AppEvent::ImageCaptured { token, image });
    }

    fn start_upload(&self, path: PathBuf) {
        let tx = self.upload_tx.clone();
        tokio::spawn(async move {
            let result = capture::load_image_file(&path).await;
            let _ = tx.send(result).await;
        });
    }

    /// Freezes the current preview frame. A frame the feed produced too
    /// long ago means the camera has stalled, not that we have a picture.
    fn snapshot(&self) -> Result<EncodedImage, CaptureError> {
        let frame = self.cached_frame.as_ref().ok_or(CaptureError::NoFrame)?;
        if !frame.is_fresh(Utc::now().timestamp_millis()) {
            return Err(CaptureError::NoFrame);
        }
        EncodedImage::from_rgb(&frame.image)
    }

    /// The upload box takes either a filesystem path or a pasted
    /// `data:<mime>;base64,` URL.
    fn handle_upload_input(&mut self, input: &str, events: &mut Vec<AppEvent>) {
        let input = input.trim();
        if input.starts_with("data:") {
            match EncodedImage::from_data_url(input) {
                Some(image) => self.begin_analysis(image, events),
                None => {
                    warn!("rejected pasted data URL");
                    self.capture_notice = Some("That is not a usable image data URL".to_string());
                }
            }
        } else {
            self.start_upload(PathBuf::from(input));
        }
    }

    /// Camera device is scoped to the Camera screen: acquired on mount,
    /// released on unmount.
    fn sync_camera_lifecycle(&mut self) {
        let wants_camera = self.state.view == AppView::Camera;

        if wants_camera && self.camera.is_none() && !self.camera_failed {
            match CameraFeed::start(&self.settings.camera) {
                Ok(feed) => {
                    info!(width = feed.width, height = feed.height, "camera feed started");
                    self.frame_rx = Some(feed.subscribe());
                    self.camera = Some(feed);
                }
                Err(e) => {
                    error!("failed to start camera: {e}");
                    self.capture_notice = Some(e.to_string());
                    self.camera_failed = true;
                }
            }
        }

        if !wants_camera && (self.camera.is_some() || self.camera_failed) {
            self.camera = None;
            self.frame_rx = None;
            self.cached_frame = None;
            self.texture = None;
            self.camera_failed = false;
            self.capture_notice = None;
        }
    }

    fn drain_camera_frames(&mut self, ctx: &egui::Context) {
        let mut feed_closed = false;
        let mut fresh_frame = false;

        if let Some(rx) = self.frame_rx.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(frame) => {
                        self.cached_frame = Some(frame);
                        fresh_frame = true;
                    }
                    Err(BroadcastTryRecvError::Empty) => break,
                    Err(BroadcastTryRecvError::Lagged(n)) => {
                        warn!("UI lagged behind, skipping {n} frames");
                    }
                    Err(BroadcastTryRecvError::Closed) => {
                        feed_closed = true;
                        break;
                    }
                }
            }
        }

        if feed_closed {
            self.camera = None;
            self.frame_rx = None;
            self.capture_notice = Some("Camera feed stopped unexpectedly".to_string());
            self.camera_failed = true;
        }

        if fresh_frame {
            if let Some(frame) = &self.cached_frame {
                let image = &frame.image;
                let color_image = egui::ColorImage::from_rgb(
                    [image.width() as usize, image.height() as usize],
                    image.as_raw(),
                );
                self.texture =
                    Some(ctx.load_texture("camera_frame", color_image, TextureOptions::default()));
            }
        }
    }

    /// A file dropped anywhere on the window while the Camera screen is up
    /// counts as an upload.
    fn take_dropped_file(&self, ctx: &egui::Context) -> Option<PathBuf> {
        if self.state.view != AppView::Camera {
            return None;
        }
        ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        })
    }
}

impl eframe::App for PoseGenieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut events: Vec<AppEvent> = Vec::new();

        // Async results first, so this frame renders the newest state.
        while let Some(outcome) = self.analysis.try_recv() {
            events.push(AppEvent::AnalysisResolved {
                token: outcome.token,
                result: outcome.result,
            });
        }

        while let Ok(result) = self.upload_rx.try_recv() {
            // The user already left the Camera screen; a late upload must
            // not drag them into an analysis they did not ask for.
            if self.state.view != AppView::Camera {
                info!("discarding upload that finished off the camera screen");
                continue;
            }
            match result {
                Ok(image) => self.begin_analysis(image, &mut events),
                Err(e) => {
                    warn!("upload rejected: {e}");
                    self.capture_notice = Some(e.to_string());
                }
            }
        }

        for event in events.drain(..) {
            self.state.apply(event);
        }

        self.sync_camera_lifecycle();
        self.drain_camera_frames(ctx);

        if let Some(path) = self.take_dropped_file(ctx) {
            self.start_upload(path);
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            AppView::Home => views::home_view::draw(ui, &mut events),
            AppView::Camera => {
                let action = views::camera_view::draw(
                    ui,
                    &self.state,
                    self.texture.as_ref(),
                    self.capture_notice.as_deref(),
                    &mut self.upload_path,
                    &mut events,
                );
                match action {
                    Some(CameraAction::Shutter) => match self.snapshot() {
                        Ok(image) => self.begin_analysis(image, &mut events),
                        Err(e) => {
                            warn!("capture unavailable: {e}");
                            self.capture_notice = Some(e.to_string());
                        }
                    },
                    Some(CameraAction::Upload(input)) => {
                        self.handle_upload_input(&input, &mut events)
                    }
                    None => {}
                }
            }
            AppView::Analysis(phase) => {
                views::analysis_view::draw(ui, &self.state, phase, &mut events)
            }
            AppView::Trending => views::trending_view::draw(ui, &mut events),
        });

        for event in events {
            self.state.apply(event);
        }

        if self.camera.is_some() {
            ctx.request_repaint();
        } else {
            // Keep polling async outcomes while nothing animates.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
