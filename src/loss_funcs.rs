pub trait LossFunc {
    /// Calculate the loss on a single target-value pair.
    fn eval(val: f64, target: f64) -> f64;
    /// Calculate the loss derivative on a single target-value pair.
    fn deriv(val: f64, target: f64) -> f64;
    /// Calculate the summed loss of all of the values.
    fn loss(val: &[f64], target: &[f64]) -> f64 {
        assert_eq!(
            val.len(),
            target.len(),
            "Value vector must be the same length as target vector. val: {}, target: {}",
            val.len(),
            target.len()
        );
        val.iter()
            .zip(target)
            .map(|(a, b)| Self::eval(*a, *b))
            .sum::<f64>()
    }
    /// Calculate the per-output errors and write them into `deriv`.
    fn gradients(val: &[f64], target: &[f64], deriv: &mut [f64]) {
        assert_eq!(val.len(), target.len());
        assert_eq!(val.len(), deriv.len());

        for ((val, target), deriv) in val.iter().zip(target).zip(deriv) {
            *deriv = Self::deriv(*val, *target);
        }
    }
}

/// Half of the squared difference, summed over all outputs.
///
/// The derivative is `target - val`, i.e. the *negative* gradient of the loss, so the
/// network steps its weights with `w += rate * error * input`.
#[derive(Clone, Debug, Default)]
pub struct SquaredError;

impl LossFunc for SquaredError {
    fn eval(val: f64, target: f64) -> f64 {
        let diff = target - val;
        0.5 * diff * diff
    }
    fn deriv(val: f64, target: f64) -> f64 {
        target - val
    }
}
