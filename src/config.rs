//! Configuration for sgt.
//!
//! [load] reads `sgt.toml` into a [Config]. The tables live in their own modules:
//! [general] for behavior, [theme] for colors and [input] for keys and the editor.

pub mod general;
pub mod input;
pub mod load;
pub mod theme;

pub use general::{General, InternalGeneral};
pub use input::{Editor, Keys};
pub use load::{Bookmark, Config};
pub use theme::Theme;
