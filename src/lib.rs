//! Monte Carlo estimation of pi, drawn one point per frame.
//!
//! A [`Driver`] owns the whole run: each tick samples a point in the unit
//! square, classifies it against the quarter circle y = sqrt(1 - x^2),
//! records it, redraws the plot and prints the running estimate. The plot is
//! shown live in an egui window unless the run is headless.

pub mod accumulator;
pub mod classifier;
pub mod config;
pub mod display;
pub mod driver;
pub mod error;
pub mod render;
pub mod sampler;
pub mod window;

pub use accumulator::Accumulator;
pub use classifier::{classify, Classification};
pub use config::{Config, SourceKind};
pub use driver::{Driver, DriverState, RunSummary};
pub use error::{Error, Result};
pub use sampler::{Point, Sampler};
