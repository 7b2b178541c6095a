use std::f64::consts::PI;
use std::io::Write;
use std::time::Duration;

use image::RgbImage;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, trace};

use crate::accumulator::Accumulator;
use crate::config::Config;
use crate::display::FrameSink;
use crate::error::Result;
use crate::render::Renderer;
use crate::sampler::{Sampler, UnitSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running { remaining: usize },
    Stopped,
}

impl DriverState {
    fn with_remaining(remaining: usize) -> Self {
        if remaining == 0 {
            DriverState::Stopped
        } else {
            DriverState::Running { remaining }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub inside: usize,
    pub outside: usize,
    pub estimate: f64,
    pub error: f64,
}

impl RunSummary {
    fn from_accumulator(acc: &Accumulator) -> Self {
        let estimate = acc.estimate();
        RunSummary {
            frames: acc.total(),
            inside: acc.inside(),
            outside: acc.outside(),
            estimate,
            error: (PI - estimate).abs(),
        }
    }
}

/// Owns a run: samples, accumulates, redraws and reports one tick at a time
/// until the frame budget is spent.
pub struct Driver<S, D, W> {
    sampler: Sampler<S>,
    accumulator: Accumulator,
    renderer: Renderer,
    sink: D,
    console: W,
    interval: Duration,
    state: DriverState,
    summary: Option<RunSummary>,
}

impl<S, D, W> Driver<S, D, W>
where
    S: UnitSource,
    D: FrameSink,
    W: Write,
{
    pub fn new(config: &Config, source: S, sink: D, console: W) -> Result<Self> {
        Ok(Driver {
            sampler: Sampler::new(source),
            accumulator: Accumulator::new(),
            renderer: Renderer::new(config)?,
            sink,
            console,
            interval: config.interval,
            state: DriverState::with_remaining(config.frames),
            summary: None,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn frame(&self) -> &RgbImage {
        self.renderer.frame()
    }

    /// Runs a single tick. A stopped driver does nothing.
    pub fn tick(&mut self) -> Result<DriverState> {
        let remaining = match self.state {
            DriverState::Running { remaining } => remaining,
            DriverState::Stopped => return Ok(DriverState::Stopped),
        };

        let point = self.sampler.sample();
        let class = self.accumulator.record(point);
        let tick = self.accumulator.total();
        trace!(tick, x = point.x, y = point.y, ?class, "sampled");

        let frame = self.renderer.draw(&self.accumulator);
        self.sink.present(frame, tick)?;
        writeln!(
            self.console,
            "Approximation: {:.6}",
            self.accumulator.estimate()
        )?;

        self.state = DriverState::with_remaining(remaining - 1);
        Ok(self.state)
    }

    /// Hands the frame on screen to the sink and reports the totals. Only the
    /// first call after the driver stops reaches the sink.
    pub fn finish(&mut self) -> Result<RunSummary> {
        if let Some(summary) = self.summary {
            return Ok(summary);
        }

        self.console.flush()?;
        self.sink.finish(self.renderer.frame())?;

        let summary = RunSummary::from_accumulator(&self.accumulator);
        info!(
            frames = summary.frames,
            inside = summary.inside,
            estimate = summary.estimate,
            error = summary.error,
            "run finished"
        );
        self.summary = Some(summary);
        Ok(summary)
    }

    /// Ticks at the configured interval until stopped, then finishes.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut interval = if self.interval.is_zero() {
            None
        } else {
            let mut interval = time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            Some(interval)
        };

        while let DriverState::Running { .. } = self.state {
            match interval.as_mut() {
                Some(interval) => {
                    interval.tick().await;
                }
                None => tokio::task::yield_now().await,
            }
            self.tick()?;
        }

        self.finish()
    }
}
