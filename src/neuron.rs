use serde::{Deserialize, Serialize};

use crate::a_funcs::{ActivFunc, Activation};
use crate::initializer::Initializer;

/// Layer index of the shared bias neuron.
pub const BIAS_LAYER: i32 = -1;
/// Layer index of the input layer.
pub const INPUT_LAYER: i32 = 0;

/// A single unit of the network.
///
/// Neurons of weighted layers (`layer > 0`) carry one weight per neuron of the previous layer,
/// preceded by the weight of the bias neuron at index 0. Input and bias neurons carry none.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Neuron {
    id: usize,
    layer: i32,
    #[serde(skip)]
    output: f64,
    /// Error accumulated from the layer above during a backward pass.
    #[serde(skip)]
    error: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    weights: Vec<f64>,
}

impl Neuron {
    /// The bias neuron, whose output is always 1.
    pub fn bias(id: usize) -> Self {
        Self {
            id,
            layer: BIAS_LAYER,
            output: 1.,
            error: 0.,
            weights: Vec::new(),
        }
    }

    pub fn input(id: usize) -> Self {
        Self {
            id,
            layer: INPUT_LAYER,
            output: 0.,
            error: 0.,
            weights: Vec::new(),
        }
    }

    /// Creates a neuron of a weighted layer with `prev_size + 1` weights taken from `init`.
    pub fn weighted<I: Initializer>(
        id: usize,
        layer: i32,
        prev_size: usize,
        size: usize,
        init: &mut I,
    ) -> Self {
        debug_assert!(layer > INPUT_LAYER);
        Self {
            id,
            layer,
            output: 0.,
            error: 0.,
            weights: (0..=prev_size).map(|_| init.get(prev_size, size)).collect(),
        }
    }

    /// Feeds a value into the neuron. Input neurons pass it through unchanged, all others apply `activation`.
    pub fn set_input(&mut self, input: f64, activation: &Activation) {
        if self.layer == INPUT_LAYER {
            self.output = input;
        } else {
            self.output = activation.evaluate(input);
        }
    }

    /// Bias weight times bias output plus the weighted outputs of the previous layer.
    pub fn weighted_sum(&self, bias: &Neuron, prev: &[Neuron]) -> f64 {
        debug_assert_eq!(self.weights.len(), prev.len() + 1);
        let (bias_w, weights) = match self.weights.split_first() {
            Some(split) => split,
            None => return 0.,
        };
        weights
            .iter()
            .zip(prev)
            .fold(bias.output * bias_w, |acc, (w, n)| acc + n.output * w)
    }

    /// Consumes the accumulated error: scales it by the activation derivative, hands it down to
    /// the bias and the previous layer, and steps every weight. The error is zero afterwards.
    pub fn backpropagate(
        &mut self,
        bias: &mut Neuron,
        prev: &mut [Neuron],
        activation: &Activation,
        learning_rate: f64,
    ) {
        debug_assert_eq!(self.weights.len(), prev.len() + 1);
        self.error *= activation.derivative(self.output);
        let error = self.error;

        if let Some((bias_w, weights)) = self.weights.split_first_mut() {
            bias.error += error * *bias_w;
            *bias_w += learning_rate * error * bias.output;

            for (w, n) in weights.iter_mut().zip(prev) {
                n.error += error * *w;
                *w += learning_rate * error * n.output;
            }
        }
        self.error = 0.;
    }

    //getters
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn layer(&self) -> i32 {
        self.layer
    }
    pub fn output(&self) -> f64 {
        self.output
    }
    pub fn error(&self) -> f64 {
        self.error
    }
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    //setters
    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        &mut self.weights
    }
    pub(crate) fn set_error(&mut self, error: f64) {
        self.error = error;
    }
    /// Restores the scratch state a freshly constructed neuron would have.
    pub(crate) fn reset(&mut self) {
        self.error = 0.;
        self.output = if self.layer == BIAS_LAYER { 1. } else { 0. };
    }
}
