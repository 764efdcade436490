use std::cmp::Ordering;

/// Returns the index of the largest value, or None if the slice is empty or contains NaN.
/// Ties resolve to the first index.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best, mut max) = iter.next()?;
    if max.is_nan() {
        return None;
    }
    for (i, v) in iter {
        match v.partial_cmp(max)? {
            Ordering::Greater => {
                best = i;
                max = v;
            }
            Ordering::Equal | Ordering::Less => (),
        }
    }
    Some(best)
}
