//! Document descriptors shared between the converter output and the viewer.
//!
//! A converted document arrives as a list of page frames. A frame is either a
//! stub (geometry plus a fetch source) or fully loaded (geometry plus the
//! embedded page data, most importantly the CTM mapping content coordinates
//! to layout coordinates). The per-page fetch endpoint returns exactly one
//! replacement frame of the same shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Embedded data carried by a loaded page frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Affine map `[a, b, c, d, e, f]` from content space to layout space.
    pub ctm: [f64; 6],
}

/// One page frame as emitted by the converter.
///
/// `number` is the original page number; numbers need not be contiguous or
/// start at zero. Width and height are layout units at scale 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFrameData {
    pub number: u32,
    pub width: f64,
    pub height: f64,
    /// Fetch source for the replacement frame; present on stubs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Embedded page data; present once the frame is loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PageData>,
}

impl PageFrameData {
    /// Whether this frame carries loaded content.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

/// Errors raised while decoding converter-embedded payloads.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid destination payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("destination detail is not an array")]
    NotAnArray,

    #[error("destination detail is missing the target page number")]
    MissingPage,

    #[error("unknown destination kind `{0}`")]
    UnknownKind(String),

    #[error("destination kind `{kind}` is missing parameter {index}")]
    MissingParameter { kind: &'static str, index: usize },
}

/// Parameters of a link destination, by kind.
///
/// Absent parameters mean "inherit the current value" at resolution time.
/// `FitR` corners are already top-down; every other kind is expressed in the
/// page's bottom-left coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestKind {
    Xyz { x: Option<f64>, y: Option<f64>, zoom: Option<f64> },
    Fit,
    FitB,
    FitH { y: Option<f64> },
    FitBH { y: Option<f64> },
    FitV { x: Option<f64> },
    FitBV { x: Option<f64> },
    FitR { left: f64, bottom: f64, right: f64, top: f64 },
}

/// A structured navigation target embedded in document content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// Original page number of the target page.
    pub page: u32,
    pub kind: DestKind,
}

impl Destination {
    /// Parse the compact detail array `[page, "Kind", p1, p2, p3, p4]`
    /// the converter embeds on link elements.
    pub fn from_detail(detail: &str) -> Result<Self, ModelError> {
        let value: Value = serde_json::from_str(detail)?;
        Self::from_value(&value)
    }

    /// Parse an already-decoded detail array.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let items = value.as_array().ok_or(ModelError::NotAnArray)?;

        let page = items
            .first()
            .and_then(Value::as_u64)
            .ok_or(ModelError::MissingPage)? as u32;

        let kind_name = items.get(1).and_then(Value::as_str).unwrap_or("");

        let opt = |index: usize| items.get(index).and_then(Value::as_f64);
        let req = |kind: &'static str, index: usize| {
            opt(index).ok_or(ModelError::MissingParameter { kind, index })
        };

        let kind = match kind_name {
            "XYZ" => DestKind::Xyz { x: opt(2), y: opt(3), zoom: opt(4) },
            "Fit" => DestKind::Fit,
            "FitB" => DestKind::FitB,
            "FitH" => DestKind::FitH { y: opt(2) },
            "FitBH" => DestKind::FitBH { y: opt(2) },
            "FitV" => DestKind::FitV { x: opt(2) },
            "FitBV" => DestKind::FitBV { x: opt(2) },
            "FitR" => DestKind::FitR {
                left: req("FitR", 2)?,
                bottom: req("FitR", 3)?,
                right: req("FitR", 4)?,
                top: req("FitR", 5)?,
            },
            other => return Err(ModelError::UnknownKind(other.to_owned())),
        };

        Ok(Self { page, kind })
    }
}
