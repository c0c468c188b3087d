//! Services bound into the container at bootstrap.
//!
//! Each service here is deliberately thin: its contract with the bootstrap is
//! "constructible from its inputs" (a logical database handle, a path, or a
//! previously constructed service). The heavyweight behavior — download
//! scheduling, feed fetching, content serving — lives with external
//! collaborators and is out of scope for the daemon core.

pub mod bookmark;
pub mod catalog;
pub mod content;
pub mod db;
pub mod device;
pub mod downloader;
pub mod opds;
pub mod secret;
pub mod serializer;
pub mod state;
pub mod storage;
pub mod translator;
pub mod win_registry;
