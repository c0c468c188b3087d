//! Minimalistic, string-keyed service container with lazy injection accessors.
//!
//! Design goals:
//! - One container per process, populated once during single-threaded bootstrap.
//! - Consumers resolve services by a stable identifier without knowing how the
//!   instance was produced (pre-constructed constant or lazily built singleton).
//! - Deferred resolution: a consumer can hold an accessor before the binding
//!   exists, as long as it does not read it until bootstrap has finished.
//!
//! Typical flows:
//! - Bootstrap binds constants and singleton factories in dependency order,
//!   then hands out an [`Injector`] built over the populated container.
//! - A singleton factory may resolve previously bound identifiers from the
//!   container it is given, so class-style bindings can be registered before
//!   their collaborators as long as no one resolves them until bootstrap ends.
//! - In tests, build a fresh container per case and bind in-memory stand-ins
//!   under the same identifiers.

pub mod container;
pub mod lazy;

pub use container::{ContainerError, Qualifier, ServiceContainer};
pub use lazy::{Injector, Lazy, LazyMulti};
