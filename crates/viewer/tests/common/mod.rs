//! Fake host implementations driving the engine deterministically.

use folio_viewer::{
    FragmentFetcher, PageData, PageFrameData, RenderTimer, TimerHandle, Viewer, ViewerConfig,
    Viewport,
};
use std::time::Duration;

/// Viewport whose scroll position the test sets directly; every
/// engine-driven `set_scroll` is recorded.
#[derive(Debug)]
pub struct ScriptedViewport {
    width: f64,
    height: f64,
    left: f64,
    top: f64,
    pub scroll_log: Vec<(f64, f64)>,
}

impl ScriptedViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, left: 0.0, top: 0.0, scroll_log: Vec::new() }
    }
}

impl Viewport for ScriptedViewport {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_left(&self) -> f64 {
        self.left
    }

    fn scroll_top(&self) -> f64 {
        self.top
    }

    fn set_scroll(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
        self.scroll_log.push((left, top));
    }
}

/// Fetcher that only records what was asked of it.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    pub requests: Vec<(usize, String)>,
}

impl FragmentFetcher for RecordingFetcher {
    fn fetch(&mut self, index: usize, source: &str) {
        self.requests.push((index, source.to_owned()));
    }
}

/// Timer fired by hand from the test.
#[derive(Debug, Default)]
pub struct ManualTimer {
    next: u64,
    pub armed: Vec<TimerHandle>,
    pub cancelled: Vec<TimerHandle>,
}

impl RenderTimer for ManualTimer {
    fn schedule(&mut self, _delay: Duration) -> TimerHandle {
        self.next += 1;
        let handle = TimerHandle(self.next);
        self.armed.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.push(handle);
    }
}

pub type TestViewer = Viewer<ScriptedViewport, RecordingFetcher, ManualTimer>;

pub fn frame(number: u32, width: f64, height: f64, loaded: bool) -> PageFrameData {
    PageFrameData {
        number,
        width,
        height,
        source: if loaded { None } else { Some(format!("pages/{number}.page")) },
        data: loaded.then_some(PageData { ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0] }),
    }
}

pub fn stub_frame(number: u32) -> PageFrameData {
    frame(number, 612.0, 792.0, false)
}

pub fn loaded_frame(number: u32) -> PageFrameData {
    frame(number, 612.0, 792.0, true)
}

pub fn stub_doc(count: u32) -> Vec<PageFrameData> {
    (0..count).map(stub_frame).collect()
}

pub fn loaded_doc(count: u32) -> Vec<PageFrameData> {
    (0..count).map(loaded_frame).collect()
}

pub fn viewer(frames: &[PageFrameData], width: f64, height: f64) -> TestViewer {
    viewer_with(ViewerConfig::default(), frames, width, height)
}

pub fn viewer_with(
    config: ViewerConfig,
    frames: &[PageFrameData],
    width: f64,
    height: f64,
) -> TestViewer {
    Viewer::new(
        config,
        frames,
        ScriptedViewport::new(width, height),
        RecordingFetcher::default(),
        ManualTimer::default(),
    )
    .expect("viewer builds")
}

/// Page indices fetched so far, in request order.
pub fn requested(viewer: &TestViewer) -> Vec<usize> {
    viewer.fetcher().requests.iter().map(|(index, _)| *index).collect()
}

/// Fire the most recently armed timer, if any.
pub fn fire_pending(viewer: &mut TestViewer) {
    let handle = viewer.timer().armed.last().copied();
    if let Some(handle) = handle {
        viewer.on_render_timeout(handle);
    }
}
