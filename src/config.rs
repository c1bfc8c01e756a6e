//! Fill configuration.

use crate::layout::{StandardFontLayout, TextLayout};
use std::sync::Arc;

/// Default bound on field tree depth.
///
/// ISO 32000-1:2008 Annex C does not bound field hierarchies; real forms rarely go past a
/// handful of levels.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling a form fill.
///
/// # Example
///
/// ```
/// use pdf_form_fill::config::FillOptions;
/// use pdf_form_fill::layout::StandardFontLayout;
///
/// // Naive placement, quiet logging (default)
/// let plain = FillOptions::default();
///
/// // Measured Helvetica text with per-field logging
/// let traced = FillOptions::with_standard_font(StandardFontLayout::helvetica(10.0))
///     .with_trace(true);
/// ```
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Log every per-field decision at info level instead of debug
    pub trace: bool,

    /// Maximum field tree depth before the fill is aborted
    pub max_depth: usize,

    /// Text measurement for appearance regeneration
    ///
    /// When absent, appearances show the `/DA` string verbatim with a single `Tj` and no
    /// positioning.
    pub text_layout: Option<Arc<dyn TextLayout>>,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            trace: false,
            max_depth: DEFAULT_MAX_DEPTH,
            text_layout: None,
        }
    }
}

impl FillOptions {
    /// Measured text using one of the standard fonts.
    pub fn with_standard_font(layout: StandardFontLayout) -> Self {
        Self {
            text_layout: Some(Arc::new(layout)),
            ..Self::default()
        }
    }

    /// Set the trace flag.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Set the maximum tree depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set a custom text layout.
    pub fn with_text_layout(mut self, layout: Arc<dyn TextLayout>) -> Self {
        self.text_layout = Some(layout);
        self
    }

    /// Log level for per-field decisions.
    pub(crate) fn field_log_level(&self) -> log::Level {
        if self.trace {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}
