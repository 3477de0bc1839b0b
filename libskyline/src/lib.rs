//! Skyline - Unix tools for the Bluesky timeline
//!
//! This library provides the core functionality shared by the sky-* binaries:
//! session handling and XRPC calls, typed decoding of feed payloads, console
//! rendering, and the incremental timeline synchronization engine.

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod mock;
pub mod render;
pub mod stream;

// Re-export commonly used types
pub use client::{Session, TimelineSource, XrpcClient};
pub use config::{Config, Credentials};
pub use error::{ApiError, ConfigError, Result, SkylineError};
pub use feed::{FeedPage, PostRecord};
pub use render::ConsolePresenter;
pub use stream::{FeedSource, Presenter, SyncEngine};
