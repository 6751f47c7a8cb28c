//! Resumable segmented publishing.
//!
//! The publisher walks pending content units, uploads not-yet-uploaded
//! segments one at a time, persists state after each success and halts
//! the whole batch cleanly on a quota-exhaustion signal.

pub mod error;
pub mod publisher;
pub mod state;
pub mod youtube;

pub use error::{PublishError, PublishResult};
pub use publisher::{cleanup_uploaded, run_publish, PublishOptions, VideoPublisher};
pub use state::{JsonStateStore, StateStore};
pub use youtube::{VideoMetadata, YouTubeClient};
