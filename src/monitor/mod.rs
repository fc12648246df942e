//! Downsampled, labeled statistics of a single container.
//!
//! A [`Monitor`] is created for one container: construction inspects the container and resolves
//! its [`Identity`]. [`Monitor::stream`] then drives the runtime's statistics stream and forwards
//! every `interval`-th raw sample, labeled with the application and task, to a caller-supplied
//! channel.
//!
//! ```text
//! DockerClient::stats ──> inlet (bounded) ──> forwarding worker ──> out
//!                                              (stride filter)
//! ```
//!
//! Sends into `out` wait for the consumer, so a slow consumer throttles the runtime stream
//! instead of being buffered.
mod error;
mod stride;

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::DockerClient;
use crate::container::ContainerID;
use crate::identity::Identity;

pub use error::{Error, Result};
pub use stride::Interval;

use stride::Stride;

/// Capacity of the channel between the statistics stream and the forwarding worker.
const INLET_CAPACITY: usize = 1;

/// A raw sample together with the labels of the container it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledSample<S> {
    pub app: Arc<str>,
    pub task: Arc<str>,
    pub stats: S,
}

/// Monitors a single container (task).
#[derive(Debug, Clone)]
pub struct Monitor<C> {
    client: C,
    id: ContainerID,
    identity: Identity,
    interval: Interval,
}

impl<C: DockerClient> Monitor<C> {
    /// Creates a monitor for the container `id`, forwarding every `interval`-th sample.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInterval`] if `interval` is zero. The client is not contacted.
    /// - [`Error::Inspect`] with the client's error if the container cannot be inspected.
    /// - [`Error::NotMonitored`] if no application label can be derived for the container.
    /// - [`Error::Container`] if the runtime reports a malformed container id.
    pub async fn new(client: C, id: &str, interval: usize) -> Result<Self, C::Error> {
        let interval = Interval::new(interval).ok_or(Error::InvalidInterval(interval))?;
        let info = client.inspect_container(id).await.map_err(Error::Inspect)?;
        let container_id = ContainerID::new(&info.id).map_err(Error::Container)?;

        let Some(identity) = Identity::resolve(&info, &container_id) else {
            log::debug!("Skipping container `{}`: no application label", container_id);
            return Err(Error::NotMonitored);
        };
        log::debug!(
            "Monitoring container `{}`: app={}, task={}, interval={}",
            container_id,
            identity.app(),
            identity.task(),
            interval.get()
        );

        Ok(Self {
            client,
            id: container_id,
            identity,
            interval,
        })
    }

    /// Canonical id of the monitored container.
    pub fn id(&self) -> &ContainerID {
        &self.id
    }

    pub fn app(&self) -> &str {
        self.identity.app()
    }

    pub fn task(&self) -> &str {
        self.identity.task()
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Streams labeled samples into `out` until the runtime closes the statistics stream.
    ///
    /// Returns the client's error unchanged if the stream fails. The forwarding worker is not
    /// awaited: samples already taken from the stream are still delivered after this returns,
    /// and `out` is closed once the worker is done.
    pub async fn stream(
        &self,
        out: mpsc::Sender<LabeledSample<C::Stats>>,
    ) -> std::result::Result<(), C::Error> {
        self.stream_until(out, CancellationToken::new()).await
    }

    /// Like [`Monitor::stream`], but stops as soon as `cancel` is cancelled.
    ///
    /// Cancellation ends the statistics stream, returns `Ok(())` and releases a worker waiting
    /// on a consumer that stopped reading.
    pub async fn stream_until(
        &self,
        out: mpsc::Sender<LabeledSample<C::Stats>>,
        cancel: CancellationToken,
    ) -> std::result::Result<(), C::Error> {
        let (inlet_tx, inlet_rx) = mpsc::channel(INLET_CAPACITY);
        let (app, task) = self.identity.labels();
        tokio::spawn(forward(
            inlet_rx,
            out,
            app,
            task,
            self.interval,
            cancel.clone(),
        ));

        let result = tokio::select! {
            result = self.client.stats(self.id.as_str(), true, inlet_tx) => result,
            _ = cancel.cancelled() => {
                log::debug!("Statistics stream of container `{}` cancelled", self.id);
                Ok(())
            }
        };
        if let Err(ref err) = result {
            log::debug!("Statistics stream of container `{}` failed: {}", self.id, err);
        }

        result
    }
}

/// Forwards every admitted sample from `inlet` to `out` until either side is gone.
async fn forward<S>(
    mut inlet: mpsc::Receiver<S>,
    out: mpsc::Sender<LabeledSample<S>>,
    app: Arc<str>,
    task: Arc<str>,
    interval: Interval,
    cancel: CancellationToken,
) {
    let mut stride = Stride::new(interval);
    loop {
        let stats = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            stats = inlet.recv() => match stats {
                Some(stats) => stats,
                None => break,
            },
        };
        if !stride.admit() {
            continue;
        }

        let sample = LabeledSample {
            app: Arc::clone(&app),
            task: Arc::clone(&task),
            stats,
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = out.send(sample) => {
                if sent.is_err() {
                    log::trace!("Consumer of `{}/{}` is gone, stop forwarding", app, task);
                    break;
                }
            }
        }
    }
    log::trace!("Forwarding for `{}/{}` finished", app, task);
}
