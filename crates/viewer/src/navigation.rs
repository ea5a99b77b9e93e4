//! Destination resolution.
//!
//! A destination names a target page plus a position rule; absent
//! parameters inherit from the triggering context. Every kind is expressed
//! in the page's bottom-left coordinate system and gets a vertical flip
//! after the forward transform, except `FitR`, whose corners are already
//! top-down. That asymmetry is contract, carried over from the source
//! format as-is.

use folio_doc_model::DestKind;

/// A destination reduced to concrete numbers, ready to transform and
/// scroll to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget {
    /// Position in the target page's content space.
    pub pos: (f64, f64),
    /// Absolute scale to apply before scrolling.
    pub zoom: f64,
    /// Whether the y coordinate flips (`y' = page_height − y`) after the
    /// forward transform.
    pub upside_down: bool,
}

/// Reduce `kind` against the triggering context's document-space position
/// and the current global scale.
pub fn resolve(kind: DestKind, context_pos: (f64, f64), current_scale: f64) -> ResolvedTarget {
    let (cx, cy) = context_pos;

    match kind {
        DestKind::Xyz { x, y, zoom } => ResolvedTarget {
            pos: (x.unwrap_or(cx), y.unwrap_or(cy)),
            zoom: match zoom {
                Some(z) if z != 0.0 => z,
                _ => current_scale,
            },
            upside_down: true,
        },
        DestKind::Fit | DestKind::FitB => ResolvedTarget {
            pos: (0.0, 0.0),
            zoom: current_scale,
            upside_down: true,
        },
        DestKind::FitH { y } | DestKind::FitBH { y } => ResolvedTarget {
            pos: (0.0, y.unwrap_or(cy)),
            zoom: current_scale,
            upside_down: true,
        },
        DestKind::FitV { x } | DestKind::FitBV { x } => ResolvedTarget {
            pos: (x.unwrap_or(cx), 0.0),
            zoom: current_scale,
            upside_down: true,
        },
        DestKind::FitR { left, top, .. } => ResolvedTarget {
            pos: (left, top),
            zoom: current_scale,
            upside_down: false,
        },
    }
}
