//! Report output.
//!
//! Rendering sits behind the [`ReportRenderer`] port; the bundled
//! [`JsonReportRenderer`] writes a JSON tearsheet per series. Selection
//! records are written with [`write_json_pretty`].

mod json;
mod persist;
mod port;

pub use json::{JsonReportRenderer, REPORT_EXTENSION};
pub use persist::{write_json_pretty, write_json_to};
#[cfg(test)]
pub use port::MockReportRenderer;
pub use port::{RenderError, ReportJob, ReportRenderer};
