//! Chart rendering
//!
//! Two-panel calls/puts chart of per-strike change (bars) and open volume
//! (line with markers):
//! 1. **Layout**: axis ranges, ticks and bar labels computed from the dataset
//! 2. **Figure**: explicit figure/axes objects rasterised into a PNG
//! 3. **Viewer**: the same layout in an interactive window (`gui` feature)

mod config;
pub mod figure;
pub mod font;
pub mod layout;
pub mod raster;
#[cfg(feature = "gui")]
pub mod viewer;

pub use config::*;
pub use figure::{render_chart, save_chart, Axes, Figure};
pub use layout::*;
