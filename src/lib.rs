pub mod a_funcs;
pub mod error;
pub mod helpers;
pub mod initializer;
pub mod loss_funcs;
pub mod network;
pub mod neuron;
pub mod trainer;

pub use error::{ConsError, ShapeError};
pub use network::{FeedForward, LinearBuilder, Network, NetworkConfig};
pub use trainer::{Sample, SamplesSet, Trainer, TrainingConfig};
