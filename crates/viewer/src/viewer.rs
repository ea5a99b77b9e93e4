//! The viewer: owns every piece of mutable state and drives the
//! sub-components over the host's viewport, fetch transport and timer.

use std::collections::HashMap;

use folio_doc_model::{Destination, PageFrameData};
use folio_scheduler::{LoadRegistry, RenderScheduler, RenderTimer, TimerHandle};
use log::{debug, trace, warn};

use crate::config::ViewerConfig;
use crate::input::{Key, KeyEvent};
use crate::layout::Layout;
use crate::navigation::resolve;
use crate::page::Page;
use crate::transform::TransformError;

/// Tolerance used by the sticky current-page check.
const EPS: f64 = 1e-6;

/// Scrollable viewing area owned by the host.
///
/// Scroll offsets are in content coordinates; `set_scroll` may clamp to the
/// scrollable range. The host must report user-driven scrolls back through
/// [`Viewer::on_scroll`].
pub trait Viewport {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn scroll_left(&self) -> f64;
    fn scroll_top(&self) -> f64;
    fn set_scroll(&mut self, left: f64, top: f64);
}

/// Host transport for page-fragment fetches.
///
/// `fetch` is fire-and-forget; the host reports the outcome later through
/// [`Viewer::complete_load`]. The viewer never issues two fetches for the
/// same index concurrently.
pub trait FragmentFetcher {
    fn fetch(&mut self, index: usize, source: &str);
}

/// Host-reported failure of a fragment fetch.
#[derive(Debug, Clone, thiserror::Error)]
#[error("fragment fetch failed: {0}")]
pub struct FetchError(pub String);

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("scale_step must lie strictly between 0 and 1, got {0}")]
    InvalidScaleStep(f64),

    #[error("render_timeout must be non-zero")]
    ZeroRenderTimeout,

    /// A frame descriptor carried a degenerate transform. Broken input
    /// data; never coerced.
    #[error("page {index}: {source}")]
    Transform { index: usize, source: TransformError },

    /// A fetched fragment came back without page data. Retrying would
    /// refetch the same broken payload, so this surfaces instead.
    #[error("fragment for page {index} carries no page data")]
    StubFragment { index: usize },
}

/// Exact scroll deferred until the target page finishes loading.
#[derive(Debug, Clone, Copy)]
struct PendingScroll {
    index: usize,
    pos: (f64, f64),
    upside_down: bool,
}

/// Stateful paginated viewer over a host viewport, fetcher and timer.
#[derive(Debug)]
pub struct Viewer<V, F, T> {
    config: ViewerConfig,
    viewport: V,
    fetcher: F,
    timer: T,
    pages: Vec<Page>,
    /// Original page number → document-order index. Numbers may be sparse.
    page_map: HashMap<u32, usize>,
    scale: f64,
    cur_page_idx: usize,
    registry: LoadRegistry,
    scheduler: RenderScheduler,
    pending_scroll: Option<PendingScroll>,
}

impl<V, F, T> Viewer<V, F, T>
where
    V: Viewport,
    F: FragmentFetcher,
    T: RenderTimer,
{
    /// Build a viewer over the initial document scan and run the first
    /// visibility pass. Frames that are already loaded must carry
    /// invertible transforms.
    pub fn new(
        config: ViewerConfig,
        frames: &[PageFrameData],
        viewport: V,
        fetcher: F,
        timer: T,
    ) -> Result<Self, ViewerError> {
        config.validate()?;

        let mut pages = Vec::with_capacity(frames.len());
        let mut page_map = HashMap::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let page = Page::from_frame(index, frame)
                .map_err(|source| ViewerError::Transform { index, source })?;
            page_map.insert(page.number(), index);
            pages.push(page);
        }

        let mut viewer = Self {
            config,
            viewport,
            fetcher,
            timer,
            pages,
            page_map,
            scale: 1.0,
            cur_page_idx: 0,
            registry: LoadRegistry::new(),
            scheduler: RenderScheduler::new(),
            pending_scroll: None,
        };
        viewer.render();
        Ok(viewer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn current_page(&self) -> usize {
        self.cur_page_idx
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_index(&self, number: u32) -> Option<usize> {
        self.page_map.get(&number).copied()
    }

    pub fn is_loading(&self, index: usize) -> bool {
        self.registry.is_loading(index)
    }

    pub fn render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    fn layout(&self) -> Layout {
        Layout::compute(&self.pages, self.config.page_spacing)
    }

    /// Content extent at the current scale.
    pub fn content_size(&self) -> (f64, f64) {
        let layout = self.layout();
        (layout.content_width(), layout.content_height())
    }

    /// Offset of the scrolled viewport relative to the page frame:
    /// scroll position minus the page's layout offset.
    pub fn view_position(&self, index: usize) -> Option<(f64, f64)> {
        let page_box = self.layout().page_box(index)?;
        Some((
            self.viewport.scroll_left() - page_box.left,
            self.viewport.scroll_top() - page_box.top,
        ))
    }

    /// Show pages intersecting the nearly-visible band (one viewport height
    /// above and below), request loads for unloaded ones, hide the rest,
    /// and update the sticky current-page index.
    pub fn render(&mut self) {
        let layout = self.layout();
        let container_min = self.viewport.scroll_top();
        let container_height = self.viewport.height();
        let container_max = container_min + container_height;
        let visible_min = container_min - container_height;
        let visible_max = container_max + container_height;

        let mut cur_fully_visible = false;
        let mut max_visible_ratio = 0.0;
        let mut max_visible_idx = self.cur_page_idx;
        let mut to_load = Vec::new();

        for index in 0..self.pages.len() {
            let Some(page_box) = layout.page_box(index) else { break };
            let page_min = page_box.top;
            let page_max = page_box.bottom();

            if page_min <= visible_max && page_max >= visible_min {
                if self.pages[index].is_loaded() {
                    self.pages[index].show();
                } else {
                    to_load.push(index);
                }

                if !cur_fully_visible {
                    let visible_ratio = (container_max.min(page_max)
                        - container_min.max(page_min))
                        / page_box.height;
                    if index == self.cur_page_idx && (visible_ratio - 1.0).abs() <= EPS {
                        cur_fully_visible = true;
                    } else if visible_ratio > max_visible_ratio {
                        max_visible_ratio = visible_ratio;
                        max_visible_idx = index;
                    }
                }
            } else {
                self.pages[index].hide();
            }
        }

        // Keep the current page while it stays fully visible; switching to
        // the max-ratio page here would flicker on nearly-full-screen pages.
        if !cur_fully_visible {
            self.cur_page_idx = max_visible_idx;
        }

        trace!(
            "render pass: current page {}, {} load request(s)",
            self.cur_page_idx,
            to_load.len()
        );

        let window = self.config.preload_pages;
        for index in to_load {
            self.load(index, window);
        }
    }

    /// Request a debounced render. `renew` pushes a pending deadline out;
    /// a non-renewing request coalesces into one already pending.
    pub fn schedule_render(&mut self, renew: bool) {
        self.scheduler.request(&mut self.timer, self.config.render_timeout, renew);
    }

    /// Host callback for an expired render timer.
    pub fn on_render_timeout(&mut self, handle: TimerHandle) {
        // The pending handle is cleared before render() runs: loads issued
        // by this pass re-schedule through complete_load.
        if self.scheduler.fire(handle) {
            self.render();
        }
    }

    /// Host notification of a user-driven scroll.
    pub fn on_scroll(&mut self) {
        self.schedule_render(true);
    }

    /// Host notification of a viewport resize.
    pub fn on_resize(&mut self) {
        self.schedule_render(true);
    }

    /// Request loads for the window `index .. index + window_size`. Each
    /// index is independently deduplicated; out-of-range, loaded,
    /// in-flight and sourceless pages are skipped.
    pub fn load(&mut self, index: usize, window_size: usize) {
        let end = index.saturating_add(window_size.max(1));
        for i in index..end {
            self.request_page(i);
        }
    }

    fn request_page(&mut self, index: usize) {
        let Some(page) = self.pages.get(index) else { return };
        if page.is_loaded() {
            return;
        }
        let Some(source) = page.source().map(str::to_owned) else { return };
        if !self.registry.begin(index) {
            return;
        }
        self.fetcher.fetch(index, &source);
    }

    /// Host callback with the outcome of a fragment fetch.
    ///
    /// On success the replacement frame is installed into the page's
    /// document-order slot, the current scale is applied to it, and a
    /// non-renewing render is scheduled. On failure the page stays a stub;
    /// the next visibility pass will retry.
    pub fn complete_load(
        &mut self,
        index: usize,
        outcome: Result<PageFrameData, FetchError>,
    ) -> Result<(), ViewerError> {
        if index >= self.pages.len() {
            self.registry.finish(index);
            return Ok(());
        }

        let frame = match outcome {
            Ok(frame) => frame,
            Err(err) => {
                warn!("page {index}: {err}; leaving the stub in place");
                self.registry.finish(index);
                return Ok(());
            }
        };

        let installed = self.install(index, &frame);
        self.registry.finish(index);
        installed
    }

    fn install(&mut self, index: usize, frame: &PageFrameData) -> Result<(), ViewerError> {
        if !frame.is_loaded() {
            return Err(ViewerError::StubFragment { index });
        }

        let page = Page::from_frame(index, frame)
            .map_err(|source| ViewerError::Transform { index, source })?;
        self.pages[index] = page;
        self.pages[index].rescale(self.scale);
        debug!("page {index}: installed");

        self.schedule_render(false);

        if let Some(pending) = self.pending_scroll {
            if pending.index == index {
                self.pending_scroll = None;
                self.exact_scroll(pending);
            }
        }

        Ok(())
    }

    /// Change the global scale. Ratio `0` forces absolute scale 1. The
    /// current page's offset anchors the vertical correction; the
    /// viewport's horizontal center anchors the horizontal one.
    pub fn rescale(&mut self, ratio: f64, is_relative: bool, offset_x: f64, offset_y: f64) {
        let old_scale = self.scale;
        let new_scale = if ratio == 0.0 {
            1.0
        } else if is_relative {
            old_scale * ratio
        } else {
            ratio
        };
        self.scale = new_scale;

        let prev_box = match self.layout().page_box(self.cur_page_idx) {
            Some(page_box) => page_box,
            None => return,
        };

        for page in &mut self.pages {
            page.rescale(new_scale);
        }

        let Some(next_box) = self.layout().page_box(self.cur_page_idx) else { return };

        let correction_top = next_box.top - prev_box.top;

        // The horizontal anchor is the viewport center: scale its pre-zoom
        // distance to the page's left edge, then add the edge displacement.
        let prev_center_x = self.viewport.width() / 2.0 - prev_box.left;
        let correction_left =
            prev_center_x * (new_scale / old_scale - 1.0) + next_box.left - prev_box.left;

        let left = self.viewport.scroll_left() + correction_left + offset_x;
        let top = self.viewport.scroll_top() + correction_top + offset_y;
        self.viewport.set_scroll(left, top);

        // The visible set may have changed under the new layout.
        self.schedule_render(true);
    }

    /// Scale so the current page's natural width fills the viewport, then
    /// scroll to its origin.
    pub fn fit_width(&mut self) {
        let index = self.cur_page_idx;
        let Some(page) = self.pages.get(index) else { return };
        if page.original_width() <= 0.0 {
            return;
        }
        self.rescale(self.viewport.width() / page.original_width(), false, 0.0, 0.0);
        self.scroll_to(index, None);
    }

    /// Scale so the current page's natural height fills the viewport, then
    /// scroll to its origin.
    pub fn fit_height(&mut self) {
        let index = self.cur_page_idx;
        let Some(page) = self.pages.get(index) else { return };
        if page.original_height() <= 0.0 {
            return;
        }
        self.rescale(self.viewport.height() / page.original_height(), false, 0.0, 0.0);
        self.scroll_to(index, None);
    }

    /// Scroll so `pos` (unscaled page coordinates, top-left origin, default
    /// the page origin) lands at the viewport's top-left corner.
    /// Out-of-range indices are a no-op.
    pub fn scroll_to(&mut self, index: usize, pos: Option<(f64, f64)>) {
        let Some((view_x, view_y)) = self.view_position(index) else { return };
        let (x, y) = pos.unwrap_or((0.0, 0.0));

        let left = self.viewport.scroll_left() + x * self.scale - view_x;
        let top = self.viewport.scroll_top() + y * self.scale - view_y;
        self.viewport.set_scroll(left, top);
        self.schedule_render(true);
    }

    /// Navigate to a parsed destination. `context_page` is the original
    /// page number containing the triggering element, when known; it
    /// supplies fallback coordinates for destinations with absent
    /// parameters. Returns `false` when the viewer declines (unknown
    /// target page) and default link behavior should proceed.
    pub fn navigate(&mut self, dest: &Destination, context_page: Option<u32>) -> bool {
        let context_pos = self.context_position(context_page);

        let Some(target_idx) = self.page_index(dest.page) else {
            warn!("navigation declined: no page numbered {}", dest.page);
            return false;
        };

        let target = resolve(dest.kind, context_pos, self.scale);
        debug!("navigating to page {target_idx} at {:?}", target.pos);

        self.rescale(target.zoom, false, 0.0, 0.0);

        let pending = PendingScroll {
            index: target_idx,
            pos: target.pos,
            upside_down: target.upside_down,
        };

        if self.pages[target_idx].is_loaded() {
            self.exact_scroll(pending);
        } else {
            // Two-phase: approximate scroll now for responsiveness, exact
            // scroll once the page is installed.
            self.pending_scroll = Some(pending);
            self.load(target_idx, self.config.preload_pages);
            self.scroll_to(target_idx, None);
        }
        true
    }

    /// Resolve a destination from its embedded detail payload. Malformed
    /// payloads decline like unknown targets do.
    pub fn navigate_detail(&mut self, detail: &str, context_page: Option<u32>) -> bool {
        match Destination::from_detail(detail) {
            Ok(dest) => self.navigate(&dest, context_page),
            Err(err) => {
                warn!("navigation declined: {err}");
                false
            }
        }
    }

    /// Document-space position of the triggering context: the containing
    /// page's view position, y-flipped, pushed through its inverse CTM.
    fn context_position(&self, context_page: Option<u32>) -> (f64, f64) {
        let Some(index) = context_page.and_then(|number| self.page_index(number)) else {
            return (0.0, 0.0);
        };
        let page = &self.pages[index];
        let (Some(ictm), Some((view_x, view_y))) = (page.ictm(), self.view_position(index))
        else {
            return (0.0, 0.0);
        };
        ictm.apply((view_x, page.height() - view_y))
    }

    fn exact_scroll(&mut self, pending: PendingScroll) {
        let Some(page) = self.pages.get(pending.index) else { return };
        let Some(ctm) = page.ctm() else { return };

        let (x, mut y) = ctm.apply(pending.pos);
        if pending.upside_down {
            y = page.original_height() - y;
        }
        self.scroll_to(pending.index, Some((x, y)));
    }

    /// Handle one key press. Returns `true` when consumed. Inert while
    /// `register_key_handler` is off.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if !self.config.register_key_handler {
            return false;
        }

        match event.key {
            Key::Plus if event.modifier => {
                self.rescale(1.0 / self.config.scale_step, true, 0.0, 0.0);
                true
            }
            Key::Minus if event.modifier => {
                self.rescale(self.config.scale_step, true, 0.0, 0.0);
                true
            }
            Key::Zero if event.modifier => {
                self.rescale(0.0, false, 0.0, 0.0);
                true
            }
            Key::PageUp => {
                if event.alt {
                    if self.cur_page_idx > 0 {
                        self.scroll_to(self.cur_page_idx - 1, None);
                    }
                } else {
                    self.scroll_by(0.0, -self.viewport.height());
                }
                true
            }
            Key::PageDown => {
                if event.alt {
                    self.scroll_to(self.cur_page_idx + 1, None);
                } else {
                    self.scroll_by(0.0, self.viewport.height());
                }
                true
            }
            Key::Home => {
                let left = self.viewport.scroll_left();
                self.viewport.set_scroll(left, 0.0);
                self.schedule_render(true);
                true
            }
            Key::End => {
                let left = self.viewport.scroll_left();
                let bottom = self.layout().content_height();
                self.viewport.set_scroll(left, bottom);
                self.schedule_render(true);
                true
            }
            _ => false,
        }
    }

    /// Handle a zoom wheel event: `detail` positive zooms out by
    /// `scale_step^detail`, negative zooms in. Only consumed with the
    /// modifier held.
    pub fn handle_wheel(&mut self, detail: f64, modifier: bool) -> bool {
        if !self.config.register_key_handler || !modifier {
            return false;
        }
        self.rescale(self.config.scale_step.powf(detail), true, 0.0, 0.0);
        true
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        let left = self.viewport.scroll_left() + dx;
        let top = self.viewport.scroll_top() + dy;
        self.viewport.set_scroll(left, top);
        self.schedule_render(true);
    }
}
