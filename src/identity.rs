//! Resolution of the application and task labels of a container.
//!
//! Labels end up as segments of dotted metric names, so both are sanitized with
//! [`sanitize_for_graphite`].

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::container::{ContainerID, ContainerInfo};

/// Scheduler-provided job name, takes precedence over everything else.
pub const CHRONOS_JOB_NAME: &str = "CHRONOS_JOB_NAME";
/// Scheduler-provided application id, usually with a leading `/`.
pub const MARATHON_APP_ID: &str = "MARATHON_APP_ID";

static IMAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*/([^/]*):.*").expect("image name pattern is valid"));

/// The labels a container's samples are published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    app: Arc<str>,
    task: Arc<str>,
}

impl Identity {
    /// Derives the identity of an inspected container.
    ///
    /// The application is taken, in order of precedence, from `CHRONOS_JOB_NAME`, from
    /// `MARATHON_APP_ID` (without its leading `/`), or from the image reference if it has the
    /// form `<path>/<name>:<tag>`. The task is the short form of the container id.
    ///
    /// Returns `None` if no application can be derived, i.e., the container is not meant to be
    /// monitored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use container_sampler::container::{ContainerConfig, ContainerID, ContainerInfo};
    /// # use container_sampler::identity::Identity;
    /// let info = ContainerInfo {
    ///     id: "abcdef1234567890".to_owned(),
    ///     config: ContainerConfig {
    ///         env: vec!["MARATHON_APP_ID=/group/service".to_owned()],
    ///         image: String::new(),
    ///     },
    /// };
    /// let id = ContainerID::new(&info.id).unwrap();
    /// let identity = Identity::resolve(&info, &id).unwrap();
    /// assert_eq!(identity.app(), "group_service");
    /// assert_eq!(identity.task(), "abcdef12");
    /// ```
    pub fn resolve(info: &ContainerInfo, id: &ContainerID) -> Option<Self> {
        let app = sanitize_for_graphite(extract_app(info));
        if app.is_empty() {
            return None;
        }

        Some(Self {
            app: app.into(),
            task: sanitize_for_graphite(id.short()).into(),
        })
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub(crate) fn labels(&self) -> (Arc<str>, Arc<str>) {
        (Arc::clone(&self.app), Arc::clone(&self.task))
    }
}

fn extract_app(info: &ContainerInfo) -> &str {
    if let Some(app) = non_empty_env(info, CHRONOS_JOB_NAME) {
        return app;
    }

    if let Some(app) = non_empty_env(info, MARATHON_APP_ID) {
        return app.strip_prefix('/').unwrap_or(app);
    }

    IMAGE_NAME
        .find(&info.config.image)
        .map_or("", |m| m.as_str())
}

fn non_empty_env<'a>(info: &'a ContainerInfo, key: &str) -> Option<&'a str> {
    info.config.env_var(key).filter(|value| !value.is_empty())
}

/// Replaces the characters that separate metric path segments (`.` and `/`) with `_`.
///
/// ```
/// # use container_sampler::identity::sanitize_for_graphite;
/// assert_eq!(sanitize_for_graphite("group/web.v2"), "group_web_v2");
/// ```
pub fn sanitize_for_graphite(s: &str) -> String {
    s.replace(['.', '/'], "_")
}
