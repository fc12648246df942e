/// Errors returned when constructing a [`Monitor`](super::Monitor).
///
/// `E` is the error type of the underlying [`DockerClient`](crate::client::DockerClient).
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// The container carries no application label and is skipped on purpose.
    #[error("container is not supposed to be monitored")]
    NotMonitored,
    #[error("sample interval must be positive, got {0}")]
    InvalidInterval(usize),
    #[error(transparent)]
    Inspect(E),
    #[error("inspected container has an invalid id: {0}")]
    Container(#[source] crate::container::Error),
}

impl<E> Error<E> {
    /// Returns `true` for the [`Error::NotMonitored`] outcome, which callers usually skip
    /// silently.
    pub fn is_not_monitored(&self) -> bool {
        matches!(self, Error::NotMonitored)
    }
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
