//! Application wiring and the event loop
//!
//! One current-thread runtime drives everything: prompt input arrives over
//! a channel from a blocking reader thread, uploads run as spawned tasks
//! and report back over the same channel. The controller is the only place
//! state changes.

use std::io::Write as _;
use std::path::Path;
use std::thread;

use anyhow::Context as _;
use image::RgbaImage;
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::capture::source::{FrameSource, StillImageSource, TestPatternSource};
use crate::capture::surface::CaptureSurface;
use crate::config::Config;
use crate::domain::RegionMarker;
use crate::remote::InpaintClient;
use crate::render::overlay;
use crate::session::controller::{Controller, UploadOutcome};
use crate::session::messages::Msg;
use crate::session::results::ResultKind;
use crate::session::state::SubmissionState;

const CHANNEL_CAPACITY: usize = 16;

pub(crate) fn run() -> anyhow::Result<()> {
    let config = Config::load();
    let source = source_from_args(std::env::args().nth(1));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;
    runtime.block_on(async {
        let (app, rx) = App::new(config, source)?;
        app.run(rx).await
    })
}

/// An image path on the command line stands in for the camera
fn source_from_args(path: Option<String>) -> Box<dyn FrameSource> {
    match path {
        Some(path) => Box::new(StillImageSource::new(path)),
        None => Box::new(TestPatternSource::new()),
    }
}

pub struct App {
    config: Config,
    surface: CaptureSurface,
    controller: Controller,
    client: InpaintClient,
    tx: Sender<Msg>,
}

impl App {
    fn new(config: Config, source: Box<dyn FrameSource>) -> anyhow::Result<(Self, Receiver<Msg>)> {
        let client = InpaintClient::new(&config.api_url)
            .context("failed to construct the service client")?;
        let marker = RegionMarker::new(config.marker_size);
        let mut surface = CaptureSurface::new(source, marker, config.mirror_preview);

        // Reported once here; capture stays a visible no-op afterwards.
        if let Err(err) = surface.start_stream(config.stream) {
            log::error!("{err}");
            println!("camera unavailable, capture is disabled ({err})");
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let app = Self {
            config,
            surface,
            controller: Controller::new(),
            client,
            tx,
        };
        Ok((app, rx))
    }

    async fn run(mut self, mut rx: Receiver<Msg>) -> anyhow::Result<()> {
        spawn_prompt_reader(self.tx.clone());
        println!("patchcam, talking to {}", self.client.endpoint());
        println!("commands: capture (c), submit (s), preview (p), status, quit (q)");

        while let Some(msg) = rx.recv().await {
            if !self.handle(msg) {
                break;
            }
        }
        Ok(())
    }

    /// Dispatch one message; `false` ends the loop
    fn handle(&mut self, msg: Msg) -> bool {
        match msg {
            Msg::Capture => match self.surface.capture_frame() {
                Some(snapshot) => {
                    println!(
                        "captured {}x{} frame ({} bytes)",
                        snapshot.width(),
                        snapshot.height(),
                        snapshot.jpeg.len()
                    );
                    self.controller.capture(snapshot);
                }
                None => println!("no active camera stream, nothing captured"),
            },
            Msg::Submit => self.submit(),
            Msg::Preview => self.write_previews(),
            Msg::Status => self.print_status(),
            Msg::UploadFinished(generation, outcome) => {
                if self.controller.finish(generation, outcome) {
                    match self.controller.state() {
                        SubmissionState::Succeeded => self.report_success(),
                        SubmissionState::Failed => println!(
                            "upload failed: {}",
                            self.controller.last_error().unwrap_or("unknown error")
                        ),
                        _ => {}
                    }
                }
            }
            Msg::Quit => {
                self.surface.stop_stream();
                return false;
            }
        }
        true
    }

    fn submit(&mut self) {
        let superseding = self.controller.state().is_uploading();
        // Submitting without a snapshot is a quiet no-op, not an error.
        let Some(pending) = self.controller.submit() else {
            log::debug!("submit ignored, no snapshot captured");
            return;
        };
        if superseding {
            println!("superseding the upload still in flight");
        }
        println!("uploading snapshot to {}...", self.client.endpoint());

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match client.process(&pending.snapshot).await {
                Ok(results) => UploadOutcome::Success(results),
                Err(err) => UploadOutcome::Failure(err),
            };
            let _ = tx
                .send(Msg::UploadFinished(pending.generation, outcome))
                .await;
        });
    }

    fn report_success(&self) {
        let Some(results) = self.controller.results() else {
            return;
        };
        println!("inpainting finished:");
        for kind in ResultKind::ALL {
            let uri = results.data_uri(kind);
            match results.decode(kind) {
                Ok(img) => println!(
                    "  {}: {}x{}, data URI {} chars",
                    kind.label(),
                    img.width(),
                    img.height(),
                    uri.len()
                ),
                Err(err) => {
                    println!("  {}: data URI {} chars", kind.label(), uri.len());
                    log::warn!("{} payload did not decode: {err:#}", kind.label());
                }
            }
        }
        match self.config.save_location.resolve_dir() {
            Some(dir) => match results.save_all(&dir) {
                Ok(paths) => {
                    for path in paths {
                        println!("  wrote {}", path.display());
                    }
                }
                Err(err) => log::error!("could not save results: {err:#}"),
            },
            None => log::warn!("no save directory available, results not written"),
        }
    }

    /// Write the live view and the captured preview, marker included, as
    /// PNG files. The marker sits at the same pixel geometry in both.
    fn write_previews(&mut self) {
        let Some(dir) = self.config.save_location.resolve_dir() else {
            println!("no save directory available");
            return;
        };
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();

        match self.surface.live_preview() {
            Some(view) => {
                let path = dir.join(format!("Patchcam_{stamp}_live.png"));
                match save_png(&view, &path) {
                    Ok(()) => println!("  wrote {}", path.display()),
                    Err(err) => log::error!("could not write live preview: {err:#}"),
                }
            }
            None => println!("no active camera stream, no live preview"),
        }

        match self.controller.snapshot() {
            Some(snapshot) => match self.surface.snapshot_preview(snapshot) {
                Ok(view) => {
                    let path = dir.join(format!("Patchcam_{stamp}_captured.png"));
                    match save_png(&view, &path) {
                        Ok(()) => println!("  wrote {}", path.display()),
                        Err(err) => log::error!("could not write captured preview: {err:#}"),
                    }
                }
                Err(err) => log::error!("could not decode the snapshot: {err:#}"),
            },
            None => println!("no snapshot captured yet"),
        }
    }

    fn print_status(&self) {
        println!("state: {}", self.controller.state());
        println!("endpoint: {}", self.client.endpoint());
        match self.surface.stream() {
            Some(stream) => {
                let config = stream.config();
                println!(
                    "camera: streaming {}x{} ({:?})",
                    config.width, config.height, config.facing
                );
            }
            None => println!("camera: no stream"),
        }
        println!("marker: {} px centered square", self.surface.marker().size);
        match self.controller.snapshot() {
            Some(snapshot) => println!("snapshot: {snapshot:?}"),
            None => println!("snapshot: none"),
        }
        println!(
            "submit: {}",
            if self.controller.state().allows_submit() {
                "ready"
            } else {
                "needs a capture first"
            }
        );
        if self.controller.results().is_some() {
            println!("results: base, hole and prediction available");
        }
        if let Some(err) = self.controller.last_error() {
            println!("last error: {err}");
        }
    }
}

fn save_png(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    Ok(overlay::write_png(&mut file, img)?)
}

/// Forward prompt lines to the event loop from a blocking reader thread
fn spawn_prompt_reader(tx: Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            let _ = std::io::stdout().flush();
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    let _ = tx.blocking_send(Msg::Quit);
                    break;
                }
                Ok(_) => match Msg::parse(&line) {
                    Some(Ok(msg)) => {
                        if tx.blocking_send(msg).is_err() {
                            break;
                        }
                    }
                    Some(Err(word)) => {
                        println!("unknown command: {word} (try capture, submit, preview, status, quit)");
                    }
                    None => {}
                },
                Err(err) => {
                    log::error!("stdin read failed: {err}");
                    let _ = tx.blocking_send(Msg::Quit);
                    break;
                }
            }
        }
    });
}
