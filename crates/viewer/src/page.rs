//! Per-page state: geometry, load/show state, transforms, scale.

use folio_doc_model::PageFrameData;

use crate::transform::{Transform, TransformError};

/// Content state of a page slot.
///
/// A page transitions from `Stub` to `Loaded` exactly once, by being
/// replaced wholesale with a fetched frame; there is no partially-loaded
/// state.
#[derive(Debug, Clone)]
pub enum PageContent {
    Stub { source: Option<String> },
    Loaded { ctm: Transform, ictm: Transform },
}

/// One page of the document, in document order.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    number: u32,
    original_width: f64,
    original_height: f64,
    /// First-observed scale ratio; `rescale(0.0)` resets to this.
    original_scale: f64,
    cur_scale: f64,
    shown: bool,
    content: PageContent,
}

impl Page {
    /// Build a page from a frame descriptor. Loaded frames must carry an
    /// invertible transform.
    pub fn from_frame(index: usize, frame: &PageFrameData) -> Result<Self, TransformError> {
        let content = match &frame.data {
            Some(data) => {
                let ctm = Transform::new(data.ctm);
                let ictm = ctm.invert()?;
                PageContent::Loaded { ctm, ictm }
            }
            None => PageContent::Stub { source: frame.source.clone() },
        };

        Ok(Self {
            index,
            number: frame.number,
            original_width: frame.width,
            original_height: frame.height,
            original_scale: 1.0,
            cur_scale: 1.0,
            shown: false,
            content,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.content, PageContent::Loaded { .. })
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn source(&self) -> Option<&str> {
        match &self.content {
            PageContent::Stub { source } => source.as_deref(),
            PageContent::Loaded { .. } => None,
        }
    }

    pub fn ctm(&self) -> Option<Transform> {
        match &self.content {
            PageContent::Loaded { ctm, .. } => Some(*ctm),
            PageContent::Stub { .. } => None,
        }
    }

    pub fn ictm(&self) -> Option<Transform> {
        match &self.content {
            PageContent::Loaded { ictm, .. } => Some(*ictm),
            PageContent::Stub { .. } => None,
        }
    }

    /// Reveal the page content. No-op unless loaded.
    pub fn show(&mut self) {
        if self.is_loaded() && !self.shown {
            self.shown = true;
        }
    }

    /// Hide the page content; the frame keeps holding its place.
    pub fn hide(&mut self) {
        if self.is_loaded() && self.shown {
            self.shown = false;
        }
    }

    /// Set the page scale. `0.0` resets to the first-observed ratio. The
    /// display box always follows `original size × scale`, loaded or not.
    pub fn rescale(&mut self, ratio: f64) {
        if ratio == 0.0 {
            self.cur_scale = self.original_scale;
        } else {
            self.cur_scale = ratio;
        }
    }

    pub fn scale(&self) -> f64 {
        self.cur_scale
    }

    pub fn original_width(&self) -> f64 {
        self.original_width
    }

    pub fn original_height(&self) -> f64 {
        self.original_height
    }

    /// Current display-box width.
    pub fn width(&self) -> f64 {
        self.original_width * self.cur_scale
    }

    /// Current display-box height.
    pub fn height(&self) -> f64 {
        self.original_height * self.cur_scale
    }
}
