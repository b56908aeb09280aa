//! Miscellaneous utility functions for sgt.
//!
//! [helpers] holds small filesystem and display helpers shared by the core and the UI.
//! [cli] parses the command line.

pub mod cli;
pub mod helpers;

pub use helpers::{
    copy_recursive, expand_home_path, get_unused_path, git_branch, is_text_file, parse_color,
    shorten_home_path,
};
