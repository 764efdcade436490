mod data;
pub mod logger;

pub use data::{Sample, SamplesSet};
pub use logger::{LogFile, Logger, MockLogger, Progress, TracingLogger};

use std::fs;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::loss_funcs::{LossFunc, SquaredError};
use crate::network::{FeedForward, Network};

/// Limits of the training loops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Most forward/backward cycles [train_sample](Trainer::train_sample) spends on one sample.
    pub max_sample_iterations: usize,
    /// A progress report is emitted for every sample whose index within the epoch is a multiple of this.
    /// Zero disables periodic reports.
    pub report_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_sample_iterations: 50,
            report_every: 100,
        }
    }
}

impl TrainingConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("Failed to read training config {}", path.display()))?;
        let config = serde_json::from_str(&s)
            .with_context(|| format!("Invalid training config {}", path.display()))?;
        Ok(config)
    }
}

/// Drives online training of a [FeedForward] network: every sample is propagated forward,
/// evaluated with the loss `F` and immediately propagated backward, updating the weights in place.
///
/// Training is strictly sequential since each update depends on the ones before it.
/// Progress is reported to the logger `L`.
pub struct Trainer<L = MockLogger, F = SquaredError> {
    network: FeedForward,
    config: TrainingConfig,
    logger: L,
    loss: PhantomData<F>,
}

impl Trainer {
    pub fn new(network: FeedForward) -> Self {
        Trainer {
            network,
            config: TrainingConfig::default(),
            logger: MockLogger,
            loss: PhantomData,
        }
    }
}

impl<L, F> Trainer<L, F>
where
    L: Logger,
    F: LossFunc,
{
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger<M: Logger>(self, logger: M) -> Trainer<M, F> {
        Trainer {
            network: self.network,
            config: self.config,
            logger,
            loss: PhantomData,
        }
    }

    /// Repeatedly trains on a single sample until its loss drops to `acceptable_error`
    /// or `max_sample_iterations` cycles have been spent. Returns the number of cycles.
    pub fn train_sample(
        &mut self,
        sample: &Sample,
        acceptable_error: f64,
    ) -> Result<usize, ShapeError> {
        self.check(sample)?;
        let cap = self.config.max_sample_iterations;
        for iteration in 1..=cap {
            self.network.forward_propagation(&sample.input)?;
            let loss = self.network.loss::<F>(&sample.target)?;
            if loss <= acceptable_error {
                tracing::trace!(iteration, loss, "sample converged");
                return Ok(iteration);
            }
            self.network.backward_propagation::<F>(&sample.target)?;
        }
        tracing::trace!(iterations = cap, "sample did not converge");
        Ok(cap)
    }

    /// Trains on `samples` in stored order for at most `epochs` epochs, stepping once per sample.
    ///
    /// After every epoch the mean loss over all samples processed so far is checked against
    /// `acceptable_error`, training stops early once it is reached. The returned value is that
    /// running mean as of the last finished epoch, and the last report sent to the logger carries
    /// it with a fraction of exactly 1.
    ///
    /// All samples are checked before training starts, so a malformed sample leaves the network untouched.
    pub fn train_dataset(
        &mut self,
        samples: &SamplesSet,
        epochs: usize,
        acceptable_error: f64,
    ) -> Result<f64, ShapeError> {
        for sample in samples {
            self.check(sample)?;
        }

        let start = Instant::now();
        let total = epochs * samples.len();
        let mut processed = 0;
        let mut loss_accumulator = 0.;

        for epoch in 0..epochs {
            for (index, sample) in samples.iter().enumerate() {
                loss_accumulator += self.step(sample)?;
                processed += 1;

                let due = self.config.report_every != 0 && index % self.config.report_every == 0;
                // the closing report is the only one allowed to reach 1
                if due && processed < total {
                    self.report(
                        processed as f64 / total as f64,
                        mean(loss_accumulator, processed),
                        start,
                    );
                }
            }

            let running_mean = mean(loss_accumulator, processed);
            tracing::debug!(epoch, running_mean, "finished epoch");
            if running_mean <= acceptable_error {
                tracing::debug!(epoch, running_mean, "reached acceptable error, stopping early");
                self.report(1., running_mean, start);
                return Ok(running_mean);
            }
        }

        let run_mean = mean(loss_accumulator, processed);
        self.report(1., run_mean, start);
        Ok(run_mean)
    }

    /// One forward and one backward pass, returns the loss before the update.
    fn step(&mut self, sample: &Sample) -> Result<f64, ShapeError> {
        self.network.forward_propagation(&sample.input)?;
        let loss = self.network.loss::<F>(&sample.target)?;
        self.network.backward_propagation::<F>(&sample.target)?;
        Ok(loss)
    }

    /// Mean loss over `samples` without training.
    pub fn test(&mut self, samples: &SamplesSet) -> Result<f64, ShapeError> {
        let mut loss_accumulator = 0.;
        for sample in samples {
            self.check(sample)?;
            self.network.forward_propagation(&sample.input)?;
            loss_accumulator += self.network.loss::<F>(&sample.target)?;
        }
        Ok(mean(loss_accumulator, samples.len()))
    }

    /// Share of `samples` whose predicted class matches the class of their target.
    pub fn accuracy(&mut self, samples: &SamplesSet) -> Result<f64, ShapeError> {
        let mut hits = 0;
        for sample in samples {
            self.check(sample)?;
            if self.network.predict(&sample.input)? == sample.class() {
                hits += 1;
            }
        }
        Ok(mean(hits as f64, samples.len()))
    }

    fn check(&self, sample: &Sample) -> Result<(), ShapeError> {
        ShapeError::check_input(self.network.in_size(), sample.input.len())?;
        ShapeError::check_target(self.network.out_size(), sample.target.len())
    }

    fn report(&mut self, fraction: f64, mean_error: f64, start: Instant) {
        self.logger.progress(&Progress {
            fraction,
            mean_error,
            elapsed: start.elapsed(),
        });
    }

    pub fn network(&self) -> &FeedForward {
        &self.network
    }

    pub fn into_network(self) -> FeedForward {
        self.network
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.
    } else {
        sum / count as f64
    }
}

impl<L, F> Deref for Trainer<L, F> {
    type Target = FeedForward;

    fn deref(&self) -> &Self::Target {
        &self.network
    }
}

impl<L, F> DerefMut for Trainer<L, F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.network
    }
}
