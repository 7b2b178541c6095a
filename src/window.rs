use std::io::Write;
use std::time::Instant;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use image::RgbImage;
use tracing::error;

use crate::config::Config;
use crate::display::{Fanout, FrameSink};
use crate::driver::{Driver, DriverState, RunSummary};
use crate::error::Result;
use crate::sampler::UnitSource;

pub fn to_color_image(frame: &RgbImage) -> ColorImage {
    let (width, height) = frame.dimensions();
    ColorImage::from_rgb([width as usize, height as usize], frame.as_raw())
}

/// Pushes every frame into an egui texture shown by [`PlotApp`].
pub struct Window {
    texture: TextureHandle,
}

impl Window {
    pub fn new(ctx: &egui::Context, first: &RgbImage) -> Self {
        Window {
            texture: ctx.load_texture("plot", to_color_image(first), TextureOptions::NEAREST),
        }
    }

    pub fn texture(&self) -> TextureHandle {
        self.texture.clone()
    }
}

impl FrameSink for Window {
    fn present(&mut self, frame: &RgbImage, _tick: usize) -> Result<()> {
        self.texture.set(to_color_image(frame), TextureOptions::NEAREST);
        Ok(())
    }

    fn finish(&mut self, last: &RgbImage) -> Result<()> {
        self.texture.set(to_color_image(last), TextureOptions::NEAREST);
        Ok(())
    }
}

/// The egui application: the repaint loop drives the ticks, and the window
/// stays open on the last frame once the run is over.
pub struct PlotApp<S, W> {
    driver: Driver<S, Fanout, W>,
    texture: TextureHandle,
    next_tick: Instant,
    summary: Option<RunSummary>,
    failure: Option<String>,
}

impl<S, W> PlotApp<S, W>
where
    S: UnitSource,
    W: Write,
{
    pub fn new(
        ctx: &egui::Context,
        config: &Config,
        source: S,
        mut sinks: Fanout,
        console: W,
    ) -> Result<Self> {
        config.validate()?;

        let window = Window::new(ctx, &RgbImage::new(config.width, config.height));
        let mut texture = window.texture();
        sinks.push(window);

        let driver = Driver::new(config, source, sinks, console)?;
        texture.set(to_color_image(driver.frame()), TextureOptions::NEAREST);

        Ok(PlotApp {
            driver,
            texture,
            next_tick: Instant::now(),
            summary: None,
            failure: None,
        })
    }

    pub fn driver(&self) -> &Driver<S, Fanout, W> {
        &self.driver
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    /// Ticks once if a tick is due at `now`, and finishes the run as soon as
    /// the driver stops.
    pub fn advance(&mut self, now: Instant) -> Result<()> {
        if self.summary.is_some() {
            return Ok(());
        }

        if let DriverState::Running { .. } = self.driver.state() {
            if now < self.next_tick {
                return Ok(());
            }
            self.driver.tick()?;
            self.next_tick = now + self.driver.interval();
        }

        if self.driver.state() == DriverState::Stopped {
            self.summary = Some(self.driver.finish()?);
        }
        Ok(())
    }

    fn status_line(&self) -> String {
        let acc = self.driver.accumulator();
        format!(
            "points: {}   inside: {}   estimate: {:.6}",
            acc.total(),
            acc.inside(),
            acc.estimate()
        )
    }
}

impl<S, W> eframe::App for PlotApp<S, W>
where
    S: UnitSource,
    W: Write,
{
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.failure.is_none() {
            if let Err(err) = self.advance(Instant::now()) {
                error!(%err, "run aborted");
                self.failure = Some(err.to_string());
            }
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_line());
                if let Some(failure) = &self.failure {
                    ui.colored_label(egui::Color32::RED, failure);
                } else if self.summary.is_some() {
                    ui.label("done");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let [width, height] = self.texture.size();
            let available = ui.available_size();
            let scale = (available.x / width as f32).min(available.y / height as f32);
            let size = egui::vec2(width as f32 * scale, height as f32 * scale);
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::from_texture(&self.texture).fit_to_exact_size(size));
            });
        });

        if self.failure.is_none() && self.summary.is_none() {
            ctx.request_repaint_after(self.next_tick.saturating_duration_since(Instant::now()));
        }
    }
}
