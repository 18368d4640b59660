//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod directory_port;
mod notification_port;
mod tracker_port;

#[cfg(test)]
pub use directory_port::MockDirectoryPort;
pub use directory_port::{DirectoryLookupError, DirectoryPort};
#[cfg(test)]
pub use notification_port::MockNotificationPort;
pub use notification_port::NotificationPort;
#[cfg(test)]
pub use tracker_port::MockTrackerPort;
pub use tracker_port::{TRACKER_BASE_URL_KEY, TrackerError, TrackerPort, bug_link};
