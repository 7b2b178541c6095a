use crate::classifier::{classify, Classification};
use crate::sampler::Point;

/// Every point drawn during a run, in order, with its classification.
#[derive(Debug, Default)]
pub struct Accumulator {
    points: Vec<Point>,
    classifications: Vec<Classification>,
    inside: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, point: Point) -> Classification {
        let class = classify(point);
        self.points.push(point);
        self.classifications.push(class);
        if class == Classification::Inside {
            self.inside += 1;
        }
        class
    }

    pub fn total(&self) -> usize {
        self.points.len()
    }

    pub fn inside(&self) -> usize {
        self.inside
    }

    pub fn outside(&self) -> usize {
        self.total() - self.inside
    }

    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    pub fn points(&self) -> impl Iterator<Item = (Point, Classification)> + '_ {
        self.points
            .iter()
            .copied()
            .zip(self.classifications.iter().copied())
    }

    /// 4 * inside / total, or 0.0 before the first sample.
    pub fn estimate(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        4.0 * self.inside as f64 / self.total() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::{Lcg, RandSource, Sampler};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    #[test]
    fn empty_estimate_is_zero() {
        let acc = Accumulator::new();
        assert_eq!(acc.total(), 0);
        assert_eq!(acc.estimate(), 0.0);
    }

    #[test]
    fn counts_follow_classification() {
        let mut acc = Accumulator::new();
        assert_eq!(acc.record(Point::new(0.1, 0.1)), Classification::Inside);
        assert_eq!(acc.record(Point::new(0.9, 0.9)), Classification::Outside);
        assert_eq!(acc.record(Point::new(0.5, 0.5)), Classification::Inside);
        assert_eq!(acc.total(), 3);
        assert_eq!(acc.inside(), 2);
        assert_eq!(acc.outside(), 1);
        assert!((acc.estimate() - 8.0 / 3.0).abs() < 1e-12);
        let order: Vec<_> = acc.points().map(|(p, _)| p.x).collect();
        assert_eq!(order, vec![0.1, 0.9, 0.5]);
    }

    #[test]
    fn invariants_hold_every_step() {
        let mut sampler = Sampler::new(Lcg::new(2024));
        let mut acc = Accumulator::new();
        let mut last_inside = 0;
        for n in 1..=500 {
            acc.record(sampler.sample());
            assert_eq!(acc.total(), n);
            assert_eq!(acc.classifications().len(), n);
            assert_eq!(acc.points().count(), n);
            assert!(acc.inside() <= n);
            assert!(acc.inside() >= last_inside);
            last_inside = acc.inside();
        }
    }

    #[test]
    fn converges_with_std_rng() {
        let mut sampler = Sampler::new(RandSource::new(StdRng::seed_from_u64(42)));
        let mut acc = Accumulator::new();
        for _ in 0..100_000 {
            acc.record(sampler.sample());
        }
        assert!((acc.estimate() - PI).abs() < 0.05, "estimate {}", acc.estimate());
    }

    #[test]
    fn converges_with_lcg() {
        let mut sampler = Sampler::new(Lcg::default());
        let mut acc = Accumulator::new();
        for _ in 0..100_000 {
            acc.record(sampler.sample());
        }
        assert!((acc.estimate() - PI).abs() < 0.05, "estimate {}", acc.estimate());
    }
}
