use crate::container::ContainerInfo;

/// The subset of a container runtime client used by a [`Monitor`](crate::monitor::Monitor).
///
/// Implementations wrap the runtime's native API (e.g., the Docker Engine API). Tests substitute
/// an in-memory fake.
pub trait DockerClient: Send + Sync {
    /// One statistics snapshot as delivered by the runtime.
    type Stats: Send + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the metadata of the container with the given id.
    fn inspect_container(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<ContainerInfo, Self::Error>> + Send;

    /// Reads statistics for the given container and pushes every snapshot into `tx`.
    ///
    /// With `stream` set, the call only returns once the runtime ends the stream or the
    /// transport fails. Dropping `tx` marks the end of the stream for the receiving side.
    fn stats(
        &self,
        id: &str,
        stream: bool,
        tx: tokio::sync::mpsc::Sender<Self::Stats>,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;
}

impl<T: DockerClient + ?Sized> DockerClient for &T {
    type Stats = T::Stats;
    type Error = T::Error;

    fn inspect_container(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<ContainerInfo, Self::Error>> + Send {
        (**self).inspect_container(id)
    }

    fn stats(
        &self,
        id: &str,
        stream: bool,
        tx: tokio::sync::mpsc::Sender<Self::Stats>,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send {
        (**self).stats(id, stream, tx)
    }
}

impl<T: DockerClient + ?Sized> DockerClient for std::sync::Arc<T> {
    type Stats = T::Stats;
    type Error = T::Error;

    fn inspect_container(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<ContainerInfo, Self::Error>> + Send {
        (**self).inspect_container(id)
    }

    fn stats(
        &self,
        id: &str,
        stream: bool,
        tx: tokio::sync::mpsc::Sender<Self::Stats>,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send {
        (**self).stats(id, stream, tx)
    }
}
