//! Page layout: vertical stack with spacing, horizontally centered.
//!
//! The engine owns layout so that visibility, zoom anchoring and scrolling
//! all read offsets from the same source. Positions are in layout units at
//! the current scale; the origin is the top-left corner of the content
//! extent.

use crate::page::Page;

/// Placed rectangle of one page frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PageBox {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Computed placement of every page plus the total content extent.
#[derive(Debug, Clone)]
pub struct Layout {
    boxes: Vec<PageBox>,
    content_width: f64,
    content_height: f64,
}

impl Layout {
    /// Stack `pages` top to bottom at their current display sizes,
    /// separated by `spacing`, each centered in the content extent.
    pub fn compute(pages: &[Page], spacing: f64) -> Self {
        let content_width = pages.iter().map(Page::width).fold(0.0, f64::max);

        let mut boxes = Vec::with_capacity(pages.len());
        let mut cursor = 0.0;
        for page in pages {
            let width = page.width();
            let height = page.height();
            boxes.push(PageBox {
                left: ((content_width - width) / 2.0).max(0.0),
                top: cursor,
                width,
                height,
            });
            cursor += height + spacing;
        }

        let content_height = if pages.is_empty() { 0.0 } else { cursor - spacing };

        Self { boxes, content_width, content_height }
    }

    pub fn page_box(&self, index: usize) -> Option<PageBox> {
        self.boxes.get(index).copied()
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn content_height(&self) -> f64 {
        self.content_height
    }
}
