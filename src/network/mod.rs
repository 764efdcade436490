pub mod construction;
pub mod feed_forward;

pub use self::construction::{LinearBuilder, NetworkConfig};
pub use self::feed_forward::FeedForward;

use crate::error::ShapeError;
use crate::helpers::argmax;

/// Trait all neural network architectures must implement
pub trait Network {
    /// Propagates `input` through the network and returns the output layer's activations.
    /// Fails without touching the network if `input` doesn't match the input layer.
    fn compute(&mut self, input: &[f64]) -> Result<&[f64], ShapeError>;

    /// Get network output as of the last propagation.
    fn output(&self) -> &[f64];

    /// Returns input size of the network
    fn in_size(&self) -> usize;

    /// Return output size of the network
    fn out_size(&self) -> usize;

    /// Index of the strongest output for `input`. None if the output contains NaN.
    fn predict(&mut self, input: &[f64]) -> Result<Option<usize>, ShapeError> {
        Ok(argmax(self.compute(input)?))
    }

    /// Maps the prediction for `input` onto `labels`, where `labels[i]` names output `i`.
    fn predict_label<'a, T>(
        &mut self,
        input: &[f64],
        labels: &'a [T],
    ) -> Result<Option<&'a T>, ShapeError> {
        Ok(self.predict(input)?.and_then(|i| labels.get(i)))
    }
}
