//! Headless viewer engine for paginated HTML documents.
//!
//! A converted document is an ordered list of page frames; most arrive as
//! stubs that are fetched lazily as they approach the viewport. The engine
//! owns all viewer state (page list, scale, current page, in-flight loads,
//! the pending debounced render) and talks to its host through three
//! traits:
//!
//! - [`Viewport`]: size and scroll offsets of the viewing area;
//! - [`FragmentFetcher`]: fire-and-forget page-fragment fetches, completed
//!   via [`Viewer::complete_load`];
//! - [`RenderTimer`]: a cancellable one-shot timer, expired via
//!   [`Viewer::on_render_timeout`].
//!
//! Everything runs on one logical thread; the host forwards scroll, resize,
//! key and link events and the two completion callbacks.

mod config;
mod input;
mod layout;
mod navigation;
mod page;
mod transform;
mod viewer;

pub use config::ViewerConfig;
pub use input::{Key, KeyEvent};
pub use layout::{Layout, PageBox};
pub use page::{Page, PageContent};
pub use transform::{Transform, TransformError};
pub use viewer::{FetchError, FragmentFetcher, Viewer, ViewerError, Viewport};

// Host-facing types from the companion crates.
pub use folio_doc_model::{DestKind, Destination, ModelError, PageData, PageFrameData};
pub use folio_scheduler::{RenderTimer, TimerHandle};
