//! Dashboard View
//!
//! Single-threaded, event-driven view layer:
//!
//! ```text
//! ViewEvent ──► ViewController::apply ──► SelectionState ──► ChartBuilder ──► ChartSpec
//! ```
//!
//! The controller exclusively owns the selection; the dataset table and
//! boundaries it reads from are immutable and shared.

mod controller;
mod state;

pub use controller::{ChartView, MenuItem, RenderPayload, ViewController, PLACEHOLDER_MESSAGE};
pub use state::{ClickPoint, MapClick, SelectionState, ViewEvent, DEFAULT_MAP};
