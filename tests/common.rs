#![allow(dead_code)]

use rusty_perceptron::{FeedForward, LinearBuilder, Sample, SamplesSet};

pub fn xor() -> SamplesSet {
    vec![
        Sample::new(vec![0., 0.], vec![0.]),
        Sample::new(vec![0., 1.], vec![1.]),
        Sample::new(vec![1., 0.], vec![1.]),
        Sample::new(vec![1., 1.], vec![0.]),
    ]
    .into()
}

/// 2-4-1 sigmoid network with a learning rate high enough for the mean xor loss of a run to
/// drop below 0.02 within 2000 epochs for most seeds.
pub fn xor_network(seed: u64) -> FeedForward {
    LinearBuilder::new(2)
        .layer(4)
        .layer(1)
        .learning_rate(2.)
        .seed(seed)
        .build()
        .unwrap()
}

/// Samples of three classes separated along the first input.
pub fn bands(count: usize) -> SamplesSet {
    (0..count)
        .map(|i| {
            let x = i as f64 / count as f64;
            let class = (x * 3.) as usize;
            Sample::one_hot(vec![x, 1. - x], class, 3)
        })
        .collect::<Result<_, _>>()
        .unwrap()
}
