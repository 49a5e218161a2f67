//! Text control surface for the sensor board.
//!
//! Presents the menu, turns selections into device commands, and streams
//! interval-run progress back to the user before handing over the report.

pub mod menu;
pub mod surface;

// Re-export commonly used items
pub use menu::{ControlState, MenuAction, MENU_TEXT};
pub use surface::{run_console, ControlSurface, Flow};
