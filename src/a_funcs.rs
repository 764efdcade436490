use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// An activation function together with its derivative.
///
/// The derivative receives the *activated* output of a neuron rather than its weighted input,
/// since that is the only value a neuron keeps around after forward propagation.
#[enum_dispatch]
pub trait ActivFunc {
    fn evaluate(&self, x: f64) -> f64;
    fn derivative(&self, out: f64) -> f64;
}

/// The activation used by every weighted layer of a network.
/// Each network owns its own instance, so networks with different activations can coexist.
#[enum_dispatch(ActivFunc)]
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum Activation {
    Sigmoid,
    TanH,
    ReLU,
    Identity,
}

impl Default for Activation {
    fn default() -> Self {
        Sigmoid.into()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Sigmoid;
impl ActivFunc for Sigmoid {
    fn evaluate(&self, x: f64) -> f64 {
        1. / (1. + (-x).exp())
    }
    fn derivative(&self, out: f64) -> f64 {
        out * (1. - out)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TanH;
impl ActivFunc for TanH {
    fn evaluate(&self, x: f64) -> f64 {
        x.tanh()
    }
    fn derivative(&self, out: f64) -> f64 {
        1. - out * out
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ReLU;
impl ActivFunc for ReLU {
    fn evaluate(&self, x: f64) -> f64 {
        f64::max(x, 0.)
    }
    fn derivative(&self, out: f64) -> f64 {
        if out > 0. {
            1.
        } else {
            0.
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Identity;
impl ActivFunc for Identity {
    fn evaluate(&self, x: f64) -> f64 {
        x
    }
    fn derivative(&self, _: f64) -> f64 {
        1.
    }
}
