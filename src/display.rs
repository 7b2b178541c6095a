use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

use crate::error::Result;

/// Destination for rendered frames.
pub trait FrameSink {
    /// Called once per tick with the freshly drawn frame.
    fn present(&mut self, frame: &RgbImage, tick: usize) -> Result<()>;

    /// Called once when the driver stops, with whatever frame is on screen.
    fn finish(&mut self, _last: &RgbImage) -> Result<()> {
        Ok(())
    }
}

/// Keeps the latest frame in memory.
#[derive(Debug, Default)]
pub struct Headless {
    last: Option<RgbImage>,
    presented: usize,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.last.as_ref()
    }

    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl FrameSink for Headless {
    fn present(&mut self, frame: &RgbImage, _tick: usize) -> Result<()> {
        match &mut self.last {
            Some(last) if last.dimensions() == frame.dimensions() => {
                last.copy_from_slice(frame.as_raw());
            }
            _ => self.last = Some(frame.clone()),
        }
        self.presented += 1;
        Ok(())
    }

    fn finish(&mut self, last: &RgbImage) -> Result<()> {
        if self.last.is_none() {
            self.last = Some(last.clone());
        }
        Ok(())
    }
}

/// Saves the final frame as a PNG once the run is over.
pub struct PngSnapshot {
    path: PathBuf,
}

impl PngSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PngSnapshot { path: path.into() }
    }
}

impl FrameSink for PngSnapshot {
    fn present(&mut self, _frame: &RgbImage, _tick: usize) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, last: &RgbImage) -> Result<()> {
        debug!(path = %self.path.display(), "writing snapshot");
        last.save(&self.path)?;
        Ok(())
    }
}

/// Writes every frame as `frame_NNNNN.png` into a directory.
pub struct PngSequence {
    dir: PathBuf,
}

impl PngSequence {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(PngSequence { dir })
    }

    pub fn frame_path(dir: &Path, tick: usize) -> PathBuf {
        dir.join(format!("frame_{:05}.png", tick))
    }
}

impl FrameSink for PngSequence {
    fn present(&mut self, frame: &RgbImage, tick: usize) -> Result<()> {
        let path = Self::frame_path(&self.dir, tick);
        debug!(path = %path.display(), "writing frame");
        frame.save(&path)?;
        Ok(())
    }
}

/// Fans frames out to several sinks in order.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn FrameSink>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: impl FrameSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl FrameSink for Fanout {
    fn present(&mut self, frame: &RgbImage, tick: usize) -> Result<()> {
        for sink in &mut self.sinks {
            sink.present(frame, tick)?;
        }
        Ok(())
    }

    fn finish(&mut self, last: &RgbImage) -> Result<()> {
        for sink in &mut self.sinks {
            sink.finish(last)?;
        }
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn present(&mut self, frame: &RgbImage, tick: usize) -> Result<()> {
        (**self).present(frame, tick)
    }

    fn finish(&mut self, last: &RgbImage) -> Result<()> {
        (**self).finish(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::cell::Cell;
    use std::rc::Rc;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quarter_pi_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn headless_keeps_latest_frame() {
        let mut sink = Headless::new();
        assert!(sink.last_frame().is_none());

        sink.present(&RgbImage::from_pixel(4, 4, Rgb([1, 2, 3])), 1).unwrap();
        sink.present(&RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])), 2).unwrap();

        assert_eq!(sink.presented(), 2);
        assert_eq!(*sink.last_frame().unwrap().get_pixel(0, 0), Rgb([9, 9, 9]));
    }

    #[test]
    fn headless_finish_without_frames_keeps_empty_plot() {
        let mut sink = Headless::new();
        sink.finish(&RgbImage::new(2, 2)).unwrap();
        assert_eq!(sink.presented(), 0);
        assert_eq!(sink.last_frame().unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn snapshot_writes_png_on_finish() {
        let dir = scratch_dir("snapshot");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("last.png");

        let mut sink = PngSnapshot::new(&path);
        sink.present(&RgbImage::new(3, 3), 1).unwrap();
        assert!(!path.exists());

        sink.finish(&RgbImage::from_pixel(3, 3, Rgb([0, 0, 255]))).unwrap();
        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(*saved.get_pixel(1, 1), Rgb([0, 0, 255]));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn sequence_writes_one_file_per_tick() {
        let dir = scratch_dir("sequence");
        let mut sink = PngSequence::create(&dir).unwrap();
        for tick in 1..=3 {
            sink.present(&RgbImage::new(2, 2), tick).unwrap();
        }
        sink.finish(&RgbImage::new(2, 2)).unwrap();

        let mut names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["frame_00001.png", "frame_00002.png", "frame_00003.png"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    struct Counting(Rc<Cell<usize>>);

    impl FrameSink for Counting {
        fn present(&mut self, _frame: &RgbImage, _tick: usize) -> Result<()> {
            self.0.set(self.0.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn fanout_reaches_every_sink() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let mut fanout = Fanout::new();
        assert!(fanout.is_empty());
        fanout.push(Counting(first.clone()));
        fanout.push(Counting(second.clone()));
        assert_eq!(fanout.len(), 2);

        fanout.present(&RgbImage::new(1, 1), 1).unwrap();
        fanout.present(&RgbImage::new(1, 1), 2).unwrap();
        fanout.finish(&RgbImage::new(1, 1)).unwrap();

        assert_eq!(first.get(), 2);
        assert_eq!(second.get(), 2);
    }
}
