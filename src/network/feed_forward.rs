use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::Network;
use crate::a_funcs::Activation;
use crate::error::{ConsError, ShapeError};
use crate::initializer::{Initializer, Uniform};
use crate::loss_funcs::LossFunc;
use crate::neuron::{Neuron, INPUT_LAYER};

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Input, at least one hidden and output layer.
pub const MIN_LAYERS: usize = 3;

/// A fully connected feed forward network made of individual neurons.
///
/// The topology is fixed at construction; training only ever changes weight values.
/// The network can be both saved to and loaded from a file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "NetworkUnvalidated", try_from = "NetworkUnvalidated")]
pub struct FeedForward {
    bias: Neuron,
    layers: Vec<Vec<Neuron>>,
    activation: Activation,
    learning_rate: f64,
    /// Outputs of the last layer as of the last forward propagation.
    output: Vec<f64>,
}

impl FeedForward {
    /// Builds a sigmoid network with uniformly random weights from a list of layer sizes.
    pub fn new(sizes: &[usize]) -> Result<Self, ConsError> {
        Self::construct(
            sizes,
            Activation::default(),
            DEFAULT_LEARNING_RATE,
            Uniform::new(),
        )
    }

    /// Same as [new](Self::new), but two networks built from the same seed are identical.
    pub fn seeded(sizes: &[usize], seed: u64) -> Result<Self, ConsError> {
        Self::construct(
            sizes,
            Activation::default(),
            DEFAULT_LEARNING_RATE,
            Uniform::seeded(seed),
        )
    }

    pub(crate) fn construct<I: Initializer>(
        sizes: &[usize],
        activation: Activation,
        learning_rate: f64,
        mut init: I,
    ) -> Result<Self, ConsError> {
        if sizes.len() < MIN_LAYERS {
            return Err(ConsError::TooFewLayers {
                received: sizes.len(),
            });
        }
        if let Some(index) = sizes.iter().position(|s| *s == 0) {
            return Err(ConsError::EmptyLayer { index });
        }

        // id 0 belongs to the bias
        let mut id = 1;
        let mut prev_size = None;
        let mut layers = Vec::with_capacity(sizes.len());
        for (index, &size) in sizes.iter().enumerate() {
            let layer = (0..size)
                .map(|_| {
                    let neuron = match prev_size {
                        None => Neuron::input(id),
                        Some(prev) => Neuron::weighted(id, index as i32, prev, size, &mut init),
                    };
                    id += 1;
                    neuron
                })
                .collect();
            layers.push(layer);
            prev_size = Some(size);
        }

        let network = Self::from_parts(layers, activation, learning_rate);
        tracing::debug!(
            topology = ?sizes,
            weights = network.weight_count(),
            ?activation,
            learning_rate,
            "constructed network"
        );
        Ok(network)
    }

    fn from_parts(layers: Vec<Vec<Neuron>>, activation: Activation, learning_rate: f64) -> Self {
        let out_size = layers.last().map_or(0, Vec::len);
        Self {
            bias: Neuron::bias(0),
            layers,
            activation,
            learning_rate,
            output: vec![0.; out_size],
        }
    }

    /// Feeds `input` into the input layer and evaluates every following layer in order.
    /// The result is left in the neurons of the last layer and in [output](Network::output).
    pub fn forward_propagation(&mut self, input: &[f64]) -> Result<(), ShapeError> {
        ShapeError::check_input(self.in_size(), input.len())?;
        let activation = self.activation;

        for (neuron, x) in self.layers[0].iter_mut().zip(input) {
            neuron.set_input(*x, &activation);
        }

        for l in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(l);
            let prev = &done[l - 1];
            for neuron in rest[0].iter_mut() {
                let sum = neuron.weighted_sum(&self.bias, prev);
                neuron.set_input(sum, &activation);
            }
        }

        let last = &self.layers[self.layers.len() - 1];
        self.output.clear();
        self.output.extend(last.iter().map(Neuron::output));
        Ok(())
    }

    /// Sets the output errors from the derivative of `F` against `target`, then walks the layers
    /// from last to first. Every neuron passes its error down and steps its weights in place.
    ///
    /// Expects [forward_propagation](Self::forward_propagation) to have been called with the matching input.
    pub fn backward_propagation<F: LossFunc>(&mut self, target: &[f64]) -> Result<(), ShapeError> {
        ShapeError::check_target(self.out_size(), target.len())?;
        let activation = self.activation;
        let learning_rate = self.learning_rate;

        if let Some(last) = self.layers.last_mut() {
            for (neuron, t) in last.iter_mut().zip(target) {
                neuron.set_error(F::deriv(neuron.output(), *t));
            }
        }

        for l in (1..self.layers.len()).rev() {
            let (below, rest) = self.layers.split_at_mut(l);
            let prev = &mut below[l - 1];
            for neuron in rest[0].iter_mut() {
                neuron.backpropagate(&mut self.bias, prev, &activation, learning_rate);
            }
        }

        // nothing consumes the errors of the bias and the input layer
        self.bias.set_error(0.);
        for neuron in self.layers[0].iter_mut() {
            neuron.set_error(0.);
        }
        Ok(())
    }

    /// Loss of the current output against `target`.
    pub fn loss<F: LossFunc>(&self, target: &[f64]) -> Result<f64, ShapeError> {
        ShapeError::check_target(self.out_size(), target.len())?;
        Ok(F::loss(&self.output, target))
    }

    /// Copies the weights of another network with the same topology.
    pub fn copy_weights(&mut self, other: &FeedForward) -> Result<(), ConsError> {
        if self.topology() != other.topology() {
            return Err(ConsError::Incompatible {
                left: self.topology(),
                right: other.topology(),
            });
        }
        let pairs = self
            .layers
            .iter_mut()
            .flatten()
            .zip(other.layers.iter().flatten());
        for (to, from) in pairs {
            to.weights_mut().copy_from_slice(from.weights());
        }
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read network from {}", path.display()))?;
        let network: Self = serde_json::from_str(&s)
            .with_context(|| format!("Invalid network file {}", path.display()))?;
        Ok(network)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string(&self)?)
            .with_context(|| format!("Failed to write network to {}", path.display()))?;
        Ok(())
    }

    //getters
    /// Number of neurons in each layer, input layer first.
    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(Vec::len).collect()
    }
    pub fn layers(&self) -> &[Vec<Neuron>] {
        &self.layers
    }
    pub fn bias(&self) -> &Neuron {
        &self.bias
    }
    pub fn activation(&self) -> Activation {
        self.activation
    }
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
    pub fn weight_count(&self) -> usize {
        self.layers.iter().flatten().map(|n| n.weights().len()).sum()
    }

    //setters
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }
}

impl Network for FeedForward {
    fn compute(&mut self, input: &[f64]) -> Result<&[f64], ShapeError> {
        self.forward_propagation(input)?;
        Ok(&self.output)
    }

    fn output(&self) -> &[f64] {
        &self.output
    }

    fn in_size(&self) -> usize {
        self.layers[0].len()
    }

    fn out_size(&self) -> usize {
        self.output.len()
    }
}

/// When deserializing, we first construct this object, validate that it's structure is correct and convert to FeedForward
#[derive(Serialize, Deserialize)]
struct NetworkUnvalidated {
    activation: Activation,
    learning_rate: f64,
    layers: Vec<Vec<Neuron>>,
}

impl From<FeedForward> for NetworkUnvalidated {
    fn from(network: FeedForward) -> Self {
        NetworkUnvalidated {
            activation: network.activation,
            learning_rate: network.learning_rate,
            layers: network.layers,
        }
    }
}

impl TryFrom<NetworkUnvalidated> for FeedForward {
    type Error = ConsError;
    fn try_from(mut value: NetworkUnvalidated) -> Result<Self, Self::Error> {
        if value.layers.len() < MIN_LAYERS {
            return Err(ConsError::TooFewLayers {
                received: value.layers.len(),
            });
        }

        let mut prev_size = None;
        for (index, layer) in value.layers.iter().enumerate() {
            if layer.is_empty() {
                return Err(ConsError::EmptyLayer { index });
            }
            let expected = prev_size.map_or(0, |s| s + 1);
            for (neuron, n) in layer.iter().enumerate() {
                if n.layer() != index as i32 {
                    return Err(ConsError::LayerIndex {
                        layer: index,
                        neuron,
                        claimed: n.layer(),
                    });
                }
                if n.weights().len() != expected {
                    return Err(ConsError::WeightCount {
                        layer: index,
                        neuron,
                        expected,
                        received: n.weights().len(),
                    });
                }
            }
            prev_size = Some(layer.len());
        }
        debug_assert!(value.layers[0].iter().all(|n| n.layer() == INPUT_LAYER));

        for n in value.layers.iter_mut().flatten() {
            n.reset();
        }

        Ok(FeedForward::from_parts(
            value.layers,
            value.activation,
            value.learning_rate,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::Constant;
    use crate::loss_funcs::SquaredError;
    use approx::assert_relative_eq;

    fn zeroed(sizes: &[usize]) -> FeedForward {
        FeedForward::construct(sizes, Activation::default(), 0.1, Constant(0.)).unwrap()
    }

    #[test]
    fn too_few_layers() {
        let cases: [&[usize]; 3] = [&[], &[2], &[2, 1]];
        for sizes in cases.iter() {
            assert_eq!(
                FeedForward::new(sizes).unwrap_err(),
                ConsError::TooFewLayers {
                    received: sizes.len()
                }
            );
        }
    }

    #[test]
    fn empty_layer() {
        assert_eq!(
            FeedForward::new(&[2, 0, 1]).unwrap_err(),
            ConsError::EmptyLayer { index: 1 }
        );
    }

    #[test]
    fn topology_and_weights() {
        let net = FeedForward::seeded(&[3, 4, 2], 1).unwrap();
        assert_eq!(net.topology(), vec![3, 4, 2]);
        assert_eq!(net.in_size(), 3);
        assert_eq!(net.out_size(), 2);
        assert_eq!(net.weight_count(), 4 * 4 + 2 * 5);

        assert!(net.layers()[0].iter().all(|n| n.weights().is_empty()));
        for (prev, layer) in net.layers().iter().zip(&net.layers()[1..]) {
            for n in layer {
                assert_eq!(n.weights().len(), prev.len() + 1);
                assert!(n.weights().iter().all(|w| (-1.0..1.0).contains(w)));
            }
        }
        assert_eq!(net.bias().layer(), -1);
        assert_eq!(net.bias().output(), 1.);
    }

    #[test]
    fn ids_increase() {
        let net = FeedForward::seeded(&[2, 3, 1], 1).unwrap();
        let ids = net.layers().iter().flatten().map(Neuron::id).collect::<Vec<_>>();
        assert_eq!(ids, (1..=6).collect::<Vec<_>>());
        assert_eq!(net.bias().id(), 0);
    }

    #[test]
    fn forward_zero_weights() {
        let mut net = zeroed(&[2, 2, 1]);
        let out = net.compute(&[5., -3.]).unwrap();
        assert_relative_eq!(out[0], 0.5);
        assert_eq!(net.layers()[0][0].output(), 5.);
        assert_eq!(net.layers()[0][1].output(), -3.);
    }

    #[test]
    fn forward_known_weights() {
        use crate::initializer::WeightInit;
        // hidden: bias 0, weights 1 and 2 -> sigmoid(1*1 + 2*0.5) = sigmoid(2)
        // output: bias -1, weight 2 -> sigmoid(-1 + 2 * sigmoid(2))
        let init = WeightInit::new(vec![0., 1., 2., -1., 2.]);
        let mut net = FeedForward::construct(&[2, 1, 1], Activation::default(), 0.1, init).unwrap();
        let sig = |x: f64| 1. / (1. + (-x).exp());
        let out = net.compute(&[1., 0.5]).unwrap()[0];
        assert_relative_eq!(out, sig(-1. + 2. * sig(2.)), epsilon = 1e-12);
    }

    #[test]
    fn backward_zero_weights() {
        let mut net = zeroed(&[1, 1, 1]);
        net.forward_propagation(&[1.]).unwrap();
        net.backward_propagation::<SquaredError>(&[1.]).unwrap();

        // output error (1 - 0.5) * 0.5 * (1 - 0.5)
        let delta = 0.125;
        let out = &net.layers()[2][0];
        assert_relative_eq!(out.weights()[0], 0.1 * delta);
        assert_relative_eq!(out.weights()[1], 0.1 * delta * 0.5);
        // hidden neuron received delta * old weight (zero)
        let hidden = &net.layers()[1][0];
        assert_eq!(hidden.weights(), &[0., 0.]);

        assert!(net.layers().iter().flatten().all(|n| n.error() == 0.));
        assert_eq!(net.bias().error(), 0.);
    }

    #[test]
    fn input_shape_error_leaves_network_untouched() {
        let mut net = FeedForward::seeded(&[2, 3, 1], 3).unwrap();
        net.compute(&[0.3, 0.7]).unwrap();
        let before = serde_json::to_string(&net).unwrap();
        let out_before = net.output().to_vec();

        assert_eq!(
            net.compute(&[1., 2., 3.]).unwrap_err(),
            ShapeError::Input {
                expected: 2,
                received: 3
            }
        );
        assert_eq!(
            net.backward_propagation::<SquaredError>(&[1., 0.]).unwrap_err(),
            ShapeError::Target {
                expected: 1,
                received: 2
            }
        );
        assert_eq!(serde_json::to_string(&net).unwrap(), before);
        assert_eq!(net.output(), &out_before[..]);
    }

    #[test]
    fn backward_reduces_loss() {
        let mut net = FeedForward::seeded(&[2, 4, 1], 11).unwrap();
        let (input, target) = ([1., 0.], [1.]);
        net.forward_propagation(&input).unwrap();
        let before = net.loss::<SquaredError>(&target).unwrap();
        for _ in 0..50 {
            net.forward_propagation(&input).unwrap();
            net.backward_propagation::<SquaredError>(&target).unwrap();
        }
        net.forward_propagation(&input).unwrap();
        let after = net.loss::<SquaredError>(&target).unwrap();
        assert!(after < before, "loss went from {} to {}", before, after);
    }

    #[test]
    fn copy_weights_requires_same_topology() {
        let mut a = FeedForward::seeded(&[2, 3, 1], 1).unwrap();
        let b = FeedForward::seeded(&[2, 3, 1], 2).unwrap();
        a.copy_weights(&b).unwrap();
        assert_eq!(a.compute(&[0.1, 0.2]).unwrap(), b.clone().compute(&[0.1, 0.2]).unwrap());

        let c = FeedForward::seeded(&[2, 2, 1], 1).unwrap();
        assert!(matches!(
            a.copy_weights(&c),
            Err(ConsError::Incompatible { .. })
        ));
    }

    #[test]
    fn rejects_malformed_file() {
        let mut net = serde_json::to_value(&FeedForward::seeded(&[2, 2, 1], 1).unwrap()).unwrap();
        net["layers"][2][0]["weights"]
            .as_array_mut()
            .unwrap()
            .pop();
        let err = serde_json::from_value::<FeedForward>(net).unwrap_err();
        assert!(err.to_string().contains("expected 3 weights"), "{}", err);
    }
}
