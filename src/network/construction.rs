use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::feed_forward::{FeedForward, DEFAULT_LEARNING_RATE};
use crate::a_funcs::Activation;
use crate::error::ConsError;
use crate::initializer::{Initializer, Uniform};

/// Builder for feed forward networks, one layer size at a time.
///
/// ```
/// use rusty_perceptron::{a_funcs::Sigmoid, LinearBuilder, Network};
///
/// let network = LinearBuilder::new(2)
///     .layer(4)
///     .layer(1)
///     .activation(Sigmoid)
///     .learning_rate(0.5)
///     .seed(7)
///     .build()
///     .unwrap();
/// assert_eq!(network.topology(), vec![2, 4, 1]);
/// assert_eq!(network.in_size(), 2);
/// ```
pub struct LinearBuilder<I = Uniform> {
    sizes: Vec<usize>,
    activation: Activation,
    learning_rate: f64,
    init: I,
}

impl LinearBuilder<Uniform> {
    pub fn new(in_size: usize) -> Self {
        LinearBuilder {
            sizes: vec![in_size],
            activation: Activation::default(),
            learning_rate: DEFAULT_LEARNING_RATE,
            init: Uniform::new(),
        }
    }
}

impl<I> LinearBuilder<I>
where
    I: Initializer,
{
    /// Adds a single layer of `size` neurons to the network.
    pub fn layer(mut self, size: usize) -> Self {
        self.sizes.push(size);
        self
    }

    /// Adds all of the layers provided by the `sizes` argument.
    pub fn layers<T>(mut self, sizes: T) -> Self
    where
        T: IntoIterator<Item = usize>,
    {
        self.sizes.extend(sizes);
        self
    }

    pub fn activation<A: Into<Activation>>(mut self, activation: A) -> Self {
        self.activation = activation.into();
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Replaces the weight initializer.
    pub fn initializer<J: Initializer>(self, init: J) -> LinearBuilder<J> {
        LinearBuilder {
            sizes: self.sizes,
            activation: self.activation,
            learning_rate: self.learning_rate,
            init,
        }
    }

    /// Uses uniform initialization from a fixed seed.
    pub fn seed(self, seed: u64) -> LinearBuilder<Uniform> {
        self.initializer(Uniform::seeded(seed))
    }

    /// Builds the network. Fails if fewer than 3 layers had been provided or a layer is empty.
    pub fn build(self) -> Result<FeedForward, ConsError> {
        FeedForward::construct(&self.sizes, self.activation, self.learning_rate, self.init)
    }
}

/// Serializable description of a network.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Neuron count of every layer, input layer first.
    pub layers: Vec<usize>,
    pub learning_rate: f64,
    pub activation: Activation,
    /// Seed for the weight initializer, system entropy is used if absent.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
            activation: Activation::default(),
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn new(layers: Vec<usize>) -> Self {
        Self {
            layers,
            ..Default::default()
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read network config {}", path.display()))?;
        let config = serde_json::from_str(&s)
            .with_context(|| format!("Invalid network config {}", path.display()))?;
        Ok(config)
    }

    pub fn build(&self) -> Result<FeedForward, ConsError> {
        let init = match self.seed {
            Some(seed) => Uniform::seeded(seed),
            None => Uniform::new(),
        };
        FeedForward::construct(&self.layers, self.activation, self.learning_rate, init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a_funcs::TanH;
    use crate::initializer::Constant;
    use crate::network::Network;

    #[test]
    fn builder_matches_sizes() {
        let net = LinearBuilder::new(3)
            .layers(vec![5, 5])
            .layer(2)
            .activation(TanH)
            .learning_rate(0.3)
            .seed(1)
            .build()
            .unwrap();
        assert_eq!(net.topology(), vec![3, 5, 5, 2]);
        assert_eq!(net.activation(), Activation::from(TanH));
        assert_eq!(net.learning_rate(), 0.3);
    }

    #[test]
    fn builder_requires_hidden_layer() {
        let err = LinearBuilder::new(3).layer(2).build().unwrap_err();
        assert_eq!(err, ConsError::TooFewLayers { received: 2 });
    }

    #[test]
    fn custom_initializer() {
        let net = LinearBuilder::new(2)
            .layer(2)
            .layer(1)
            .initializer(Constant(0.25))
            .build()
            .unwrap();
        assert!(net
            .layers()
            .iter()
            .flatten()
            .flat_map(|n| n.weights())
            .all(|w| *w == 0.25));
    }

    #[test]
    fn config_defaults_and_seed() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "layers": [2, 3, 1], "seed": 5 }"#).unwrap();
        assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
        assert_eq!(config.activation, Activation::default());

        let mut a = config.build().unwrap();
        let mut b = config.build().unwrap();
        assert_eq!(
            a.compute(&[0.2, 0.9]).unwrap().to_vec(),
            b.compute(&[0.2, 0.9]).unwrap().to_vec()
        );
    }
}
