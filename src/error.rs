use thiserror::Error;

/// An error during the construction of a network, either from a layer description or from file.
#[derive(Debug, Error, PartialEq)]
pub enum ConsError {
    /// At least an input, a hidden and an output layer are required.
    #[error("The network needs at least 3 layers, but {received} were requested.")]
    TooFewLayers { received: usize },
    #[error("Layer {index} has no neurons.")]
    EmptyLayer { index: usize },
    /// A neuron's weight vector doesn't match the size of the previous layer plus the bias.
    #[error("Neuron {neuron} of layer {layer} expected {expected} weights but has {received}.")]
    WeightCount {
        layer: usize,
        neuron: usize,
        expected: usize,
        received: usize,
    },
    #[error("Neuron {neuron} of layer {layer} claims to belong to layer {claimed}.")]
    LayerIndex {
        layer: usize,
        neuron: usize,
        claimed: i32,
    },
    /// Two networks were expected to share a topology.
    #[error("Network topologies differ: {left:?} and {right:?}.")]
    Incompatible {
        left: Vec<usize>,
        right: Vec<usize>,
    },
}

/// A vector handed to the network doesn't fit its input or output layer.
/// Returned before any state is touched.
#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum ShapeError {
    #[error("Expected an input of length {expected} but received {received}.")]
    Input { expected: usize, received: usize },
    #[error("Expected a target of length {expected} but received {received}.")]
    Target { expected: usize, received: usize },
    #[error("Class {class} is out of range for {classes} outputs.")]
    Class { class: usize, classes: usize },
}

impl ShapeError {
    pub(crate) fn check_input(expected: usize, received: usize) -> Result<(), Self> {
        if expected == received {
            Ok(())
        } else {
            Err(ShapeError::Input { expected, received })
        }
    }

    pub(crate) fn check_target(expected: usize, received: usize) -> Result<(), Self> {
        if expected == received {
            Ok(())
        } else {
            Err(ShapeError::Target { expected, received })
        }
    }
}
