//! Viewer configuration.

use std::time::Duration;

use crate::viewer::ViewerError;

/// Construction-time knobs. All fields have working defaults.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Prefetch window width: how many pages, starting at a requested
    /// index, are loaded ahead of demand.
    pub preload_pages: usize,
    /// Debounce delay between a schedule request and the render pass.
    pub render_timeout: Duration,
    /// Zoom ratio applied per zoom-out step; zoom-in uses its reciprocal.
    /// Must lie strictly between 0 and 1.
    pub scale_step: f64,
    /// Whether [`crate::Viewer::handle_key`] and `handle_wheel` react to
    /// host input events.
    pub register_key_handler: bool,
    /// Vertical gap between stacked pages, in layout units.
    pub page_spacing: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            preload_pages: 3,
            render_timeout: Duration::from_millis(100),
            scale_step: 0.9,
            register_key_handler: true,
            page_spacing: 16.0,
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preload_pages(mut self, preload_pages: usize) -> Self {
        self.preload_pages = preload_pages;
        self
    }

    pub fn with_render_timeout(mut self, render_timeout: Duration) -> Self {
        self.render_timeout = render_timeout;
        self
    }

    pub fn with_scale_step(mut self, scale_step: f64) -> Self {
        self.scale_step = scale_step;
        self
    }

    pub fn with_key_handler(mut self, register_key_handler: bool) -> Self {
        self.register_key_handler = register_key_handler;
        self
    }

    pub fn with_page_spacing(mut self, page_spacing: f64) -> Self {
        self.page_spacing = page_spacing;
        self
    }

    pub fn validate(&self) -> Result<(), ViewerError> {
        if !(self.scale_step > 0.0 && self.scale_step < 1.0) {
            return Err(ViewerError::InvalidScaleStep(self.scale_step));
        }
        if self.render_timeout.is_zero() {
            return Err(ViewerError::ZeroRenderTimeout);
        }
        Ok(())
    }
}
