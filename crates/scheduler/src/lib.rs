//! Scheduling primitives for the viewer engine.
//!
//! The engine is single-threaded and host-driven: the host owns the real
//! timer and the real fetch transport, and calls back into the engine when
//! either completes. This crate provides the two pieces of bookkeeping that
//! sit between them:
//!
//! - [`RenderScheduler`], which coalesces scroll/zoom/resize bursts into at
//!   most one pending deferred render over an abstract cancellable timer;
//! - [`LoadRegistry`], which guarantees at most one in-flight fetch per page.

mod debounce;
mod registry;

pub use debounce::{RenderScheduler, RenderTimer, TimerHandle};
pub use registry::LoadRegistry;
