use rand::distributions::{Distribution, Uniform as UniformDist};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Implement Initializer for the struct reference as well
macro_rules! impl_ref {
    ($struct:ty) => {
        impl Initializer for &mut $struct {
            fn get(&mut self, in_size: usize, size: usize) -> f64 {
                <$struct as Initializer>::get(self, in_size, size)
            }
        }
    };
}

/// Supplies initial weights. `in_size` is the size of the previous layer and `size` the size
/// of the layer being initialized.
pub trait Initializer {
    fn get(&mut self, in_size: usize, size: usize) -> f64;
}

/// Draws weights uniformly from `[-1, 1)`. This is the default for new networks.
pub struct Uniform {
    rng: SmallRng,
    dist: UniformDist<f64>,
}

impl Uniform {
    /// Seeds the generator from system entropy.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Two initializers with the same seed produce the same weights.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            dist: UniformDist::new(-1., 1.),
        }
    }
}

impl Default for Uniform {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Uniform {
    fn get(&mut self, _in_size: usize, _size: usize) -> f64 {
        self.dist.sample(&mut self.rng)
    }
}
impl_ref!(Uniform);

///Xavier initialization should be used for layers with symetric activation functions such as sigmoid or tanH
pub struct Xavier {
    rng: SmallRng,
}
impl Xavier {
    pub fn new() -> Self {
        Self::seeded(0)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for Xavier {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializer for Xavier {
    fn get(&mut self, in_size: usize, _size: usize) -> f64 {
        self.rng.sample::<f64, StandardNormal>(StandardNormal) / (in_size as f64).sqrt()
    }
}
impl_ref!(Xavier);

/// Initializes every weight to the same value.
pub struct Constant(pub f64);
impl Initializer for Constant {
    fn get(&mut self, _: usize, _: usize) -> f64 {
        self.0
    }
}
impl_ref!(Constant);

/// This initializer accepts an iterator over f64 values and uses them to initialize the weights.
/// Panics if a weight is requested but the iterator returns None.
pub struct WeightInit<T: Iterator<Item = f64>> {
    iter: T,
}
impl<I: Iterator<Item = f64>> WeightInit<I> {
    pub fn new<T: IntoIterator<Item = f64, IntoIter = I>>(weights: T) -> Self {
        Self {
            iter: weights.into_iter(),
        }
    }
}

impl<I: Iterator<Item = f64>> Initializer for WeightInit<I> {
    fn get(&mut self, _in_size: usize, _size: usize) -> f64 {
        self.iter.next().expect("Ran out of weights")
    }
}

impl<I: Iterator<Item = f64>> Initializer for &mut WeightInit<I> {
    fn get(&mut self, in_size: usize, size: usize) -> f64 {
        (*self).get(in_size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_range() {
        let mut init = Uniform::seeded(7);
        for _ in 0..10_000 {
            let w = init.get(3, 3);
            assert!((-1.0..1.0).contains(&w), "weight {} out of range", w);
        }
    }

    #[test]
    fn uniform_seed_is_reproducible() {
        let mut a = Uniform::seeded(42);
        let mut b = Uniform::seeded(42);
        let a = (0..32).map(|_| a.get(1, 1)).collect::<Vec<_>>();
        let b = (0..32).map(|_| b.get(1, 1)).collect::<Vec<_>>();
        assert_eq!(a, b);
    }

    #[test]
    fn xavier_scales_with_fan_in() {
        let spread = |in_size: usize| {
            let mut init = Xavier::seeded(1);
            (0..4000).map(|_| init.get(in_size, 1).powi(2)).sum::<f64>() / 4000.
        };
        let wide = spread(100);
        let narrow = spread(1);
        assert!(wide < narrow / 50., "variances {} and {}", wide, narrow);
    }

    #[test]
    fn weight_init_replays() {
        let mut init = WeightInit::new(vec![0.5, -0.25]);
        assert_eq!(init.get(0, 0), 0.5);
        assert_eq!((&mut init).get(0, 0), -0.25);
    }
}
