//! Image Firewall moderation router
//!
//! Decodes upload notifications, decides whether each image is allowed or
//! quarantined, moves it to the matching bucket, records an audit entry and
//! alerts on quarantines.

pub mod error;
pub mod handler;
pub mod poller;
pub mod router;
pub mod setup;
pub mod telemetry;
pub mod trigger;

pub use error::RouterError;
pub use handler::handle_notification;
pub use poller::QueueTrigger;
pub use router::{ModerationRouter, RouteOutcome};
pub use setup::build_router;
pub use telemetry::init_telemetry;
pub use trigger::{parse_notification, TriggerMessage};
