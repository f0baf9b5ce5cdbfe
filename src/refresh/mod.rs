#[cfg(test)]
pub(crate) mod clock;
mod hook;
pub mod poller;
pub mod resource;

pub use hook::{use_fetch_with_refresh, RefreshDriver, RefreshableResource};
pub use poller::{BrowserTimers, PollerError, StaggeredPoller, Timers};
pub use resource::{BackgroundErrors, FetchKind, ResourceState};
