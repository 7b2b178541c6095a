use rand::Rng;

/// A sampled location in the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Source of uniformly distributed values in the closed interval [0, 1].
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

/// Linear Congruential Generator, handy when a run must be reproduced exactly.
#[derive(Debug, Clone)]
pub struct Lcg {
    seed: u32,
}

impl Lcg {
    pub const DEFAULT_SEED: u32 = 12345;

    pub fn new(seed: u32) -> Self {
        Lcg { seed }
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Lcg::new(Self::DEFAULT_SEED)
    }
}

impl UnitSource for Lcg {
    fn next_unit(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        (self.seed & 0x7FFFFFFF) as f64 / 0x7FFFFFFF as f64
    }
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng> RandSource<R> {
    pub fn new(rng: R) -> Self {
        RandSource { rng }
    }
}

impl<R: Rng> UnitSource for RandSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..=1.0)
    }
}

impl<S: UnitSource + ?Sized> UnitSource for Box<S> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

pub struct Sampler<S> {
    source: S,
}

impl<S: UnitSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Sampler { source }
    }

    /// Draws x, then y, independently from the source.
    pub fn sample(&mut self) -> Point {
        let x = self.source.next_unit();
        let y = self.source.next_unit();
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_unit_square(p: &Point) -> bool {
        (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
    }

    #[test]
    fn lcg_points_stay_in_unit_square() {
        let mut sampler = Sampler::new(Lcg::default());
        for _ in 0..10_000 {
            let p = sampler.sample();
            assert!(in_unit_square(&p), "{:?} escaped the unit square", p);
        }
    }

    #[test]
    fn rand_points_stay_in_unit_square() {
        let mut sampler = Sampler::new(RandSource::new(StdRng::seed_from_u64(7)));
        for _ in 0..10_000 {
            let p = sampler.sample();
            assert!(in_unit_square(&p), "{:?} escaped the unit square", p);
        }
    }

    #[test]
    fn lcg_is_reproducible() {
        let mut a = Sampler::new(Lcg::new(99));
        let mut b = Sampler::new(Lcg::new(99));
        for _ in 0..100 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn lcg_first_point_for_default_seed() {
        let p = Sampler::new(Lcg::default()).sample();
        assert!((p.x - 0.04080537149720144).abs() < 1e-12);
        assert!((p.y - 0.033095696490768205).abs() < 1e-12);
    }

    #[test]
    fn boxed_source_delegates() {
        let boxed: Box<dyn UnitSource> = Box::new(Lcg::new(5));
        let mut a = Sampler::new(boxed);
        let mut b = Sampler::new(Lcg::new(5));
        assert_eq!(a.sample(), b.sample());
    }
}
