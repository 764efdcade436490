use std::iter::FromIterator;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::helpers::argmax;

/// A single training example: an input vector and the output the network should produce for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new<U, V>(input: U, target: V) -> Self
    where
        U: Into<Vec<f64>>,
        V: Into<Vec<f64>>,
    {
        Self {
            input: input.into(),
            target: target.into(),
        }
    }

    /// A sample whose target is 1 at `class` and 0 for the other `classes - 1` outputs.
    pub fn one_hot<U: Into<Vec<f64>>>(
        input: U,
        class: usize,
        classes: usize,
    ) -> Result<Self, ShapeError> {
        if class >= classes {
            return Err(ShapeError::Class { class, classes });
        }
        let mut target = vec![0.; classes];
        target[class] = 1.;
        Ok(Self::new(input, target))
    }

    /// The class the target points to.
    pub fn class(&self) -> Option<usize> {
        argmax(&self.target)
    }
}

/// An ordered collection of samples. Training visits them in the stored order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SamplesSet {
    samples: Vec<Sample>,
}

impl SamplesSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl From<Vec<Sample>> for SamplesSet {
    fn from(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

impl FromIterator<Sample> for SamplesSet {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SamplesSet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for SamplesSet {
    type Output = Sample;

    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_target() {
        let s = Sample::one_hot(vec![0.1, 0.2], 2, 4).unwrap();
        assert_eq!(s.target, vec![0., 0., 1., 0.]);
        assert_eq!(s.class(), Some(2));
    }

    #[test]
    fn one_hot_out_of_range() {
        assert_eq!(
            Sample::one_hot(vec![0.], 3, 3).unwrap_err(),
            ShapeError::Class {
                class: 3,
                classes: 3
            }
        );
    }

    #[test]
    fn keeps_order() {
        let set = (0..5)
            .map(|i| Sample::new(vec![i as f64], vec![0.]))
            .collect::<SamplesSet>();
        assert_eq!(set.len(), 5);
        let inputs = set.iter().map(|s| s.input[0]).collect::<Vec<_>>();
        assert_eq!(inputs, vec![0., 1., 2., 3., 4.]);
        assert_eq!(set[3].input, vec![3.]);
    }
}
