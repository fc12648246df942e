//! Container Sampler: per-container statistics sampling for metric pipelines.
//!
//! A [`monitor::Monitor`] inspects one container, derives the application and task it belongs
//! to, and republishes a downsampled copy of the runtime's statistics stream, labeled with that
//! identity, to a channel.
//!
//! The container runtime is reached through the [`client::DockerClient`] trait; emitting the
//! labeled samples is left to the consumer of the channel.

pub mod client;
pub mod config;
pub mod container;
pub mod identity;
pub mod monitor;

pub use client::DockerClient;
pub use config::Config;
pub use monitor::{Interval, LabeledSample, Monitor};
