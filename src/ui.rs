//! Terminal UI for sgt.
//!
//! [render] draws one frame from the application state. [widgets] holds the dialogs drawn
//! on top of the listing.

pub mod render;
pub mod widgets;

pub use render::render;
