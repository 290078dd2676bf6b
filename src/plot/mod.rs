//! Rendering and export of finished learning curves
//!
//! Styling lives in an explicit [`PlotConfig`] passed to each sink; nothing here
//! keeps global drawing state.

mod csv;
mod json;
mod svg;

pub use self::csv::CsvExport;
pub use self::json::JsonExport;
pub use self::svg::SvgChart;

use crate::curve::LearningCurve;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Chart styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Overall title; each panel is captioned with its estimator name
    pub title: Option<String>,
    pub x_label: String,
    /// Defaults to the curve's metric name
    pub y_label: Option<String>,
    /// Size of a single panel in pixels
    pub width: u32,
    pub height: u32,
    /// Upper y-axis limit shared by all panels; computed from the data when unset
    pub y_max: Option<f64>,
    /// Draw a band of one standard deviation across folds
    pub show_std: bool,
    /// RGB colors
    pub train_color: (u8, u8, u8),
    pub validation_color: (u8, u8, u8),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: None,
            x_label: "Training set size".to_string(),
            y_label: None,
            width: 640,
            height: 480,
            y_max: None,
            show_std: true,
            train_color: (31, 119, 180),
            validation_color: (214, 39, 40),
        }
    }
}

impl PlotConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = Some(y_max);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_std(mut self, show_std: bool) -> Self {
        self.show_std = show_std;
        self
    }
}

/// Destination for computed curves
pub trait CurveSink {
    fn emit(&self, curves: &[LearningCurve], config: &PlotConfig) -> Result<()>;
}
