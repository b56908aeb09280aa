//! Formatting helpers for sgt.
//!
//! Turns raw metadata into display strings: permission strings, owner labels, sizes and
//! modification times. Also provides [sanitize_to_exact_width] which the UI uses to fit
//! names into a column.

use chrono::{DateTime, Local};
use humansize::{BINARY, format_size};
use unicode_width::UnicodeWidthChar;

use std::time::SystemTime;

/// Formats mode bits in the unix `drwxr-xr-x` form.
pub fn format_permissions(mode: u32, is_dir: bool) -> String {
    let mut chars = [if is_dir { 'd' } else { '-' }; 10];
    chars[1..].fill('-');

    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }
    chars.iter().collect()
}

/// Resolves `user:group` for the given ids, falling back to the numeric id for either half
/// that has no name.
#[cfg(unix)]
pub fn owner_label(uid: u32, gid: u32) -> String {
    let user = uzers::get_user_by_uid(uid)
        .map(|u| u.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| uid.to_string());
    let group = uzers::get_group_by_gid(gid)
        .map(|g| g.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| gid.to_string());
    format!("{user}:{group}")
}

#[cfg(not(unix))]
pub fn owner_label(uid: u32, gid: u32) -> String {
    format!("{uid}:{gid}")
}

/// Formats a size for the listing column. Directories show no size.
pub fn format_file_size(size: Option<u64>, is_dir: bool) -> String {
    match size {
        Some(sz) if !is_dir => format_size(sz, BINARY),
        _ => "-".to_string(),
    }
}

/// Formats a modification time as `Mon DD HH:MM` in local time.
pub fn format_file_time(modified: Option<SystemTime>) -> String {
    modified
        .map(|mtime| {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%b %d %H:%M").to_string()
        })
        .unwrap_or_default()
}

/// Cleans a string to exactly `width` columns: control characters are dropped, tabs
/// expand to 4-column stops, and the result is truncated or space padded.
pub fn sanitize_to_exact_width(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut current_w = 0;

    for char in line.chars() {
        if char == '\t' {
            let space_count = 4 - (current_w % 4);
            if current_w + space_count > width {
                break;
            }
            out.push_str(&" ".repeat(space_count));
            current_w += space_count;
            continue;
        }

        if char.is_control() {
            continue;
        }

        let w = char.width().unwrap_or(0);
        if current_w + w > width {
            break;
        }

        out.push(char);
        current_w += w;
    }

    if current_w < width {
        out.push_str(&" ".repeat(width - current_w));
    }

    out
}

/// Truncates `text` from the left so it fits in `width` columns, prefixing `...`.
///
/// Used for long paths where the tail is the interesting part.
pub fn truncate_left(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }

    let budget = width - 3;
    let mut kept = Vec::new();
    let mut used = 0;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        kept.push(c);
        used += w;
    }
    let tail: String = kept.into_iter().rev().collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_for_common_modes() {
        assert_eq!(format_permissions(0o755, true), "drwxr-xr-x");
        assert_eq!(format_permissions(0o644, false), "-rw-r--r--");
        assert_eq!(format_permissions(0o000, false), "----------");
        assert_eq!(format_permissions(0o100_600, false), "-rw-------");
    }

    #[test]
    fn size_is_blank_for_directories() {
        assert_eq!(format_file_size(Some(4096), true), "-");
        assert_eq!(format_file_size(None, false), "-");
        assert_eq!(format_file_size(Some(512), false), "512 B");
    }

    #[test]
    fn test_ui_sanitization_and_exact_width() {
        let width = 10;

        let cases = vec!["short.txt", "very_long_filename.txt", "🦀_crab.rs", "\t_tab"];

        for input in cases {
            let result = sanitize_to_exact_width(input, width);
            let actual_width = unicode_width::UnicodeWidthStr::width(result.as_str());

            assert_eq!(
                actual_width, width,
                "Failed to produce exact width for input: '{}'. Result was: '{}'",
                input, result
            );
            assert!(!result.chars().any(|c| c.is_control()));
        }
    }

    #[test]
    fn truncate_left_keeps_tail() {
        assert_eq!(truncate_left("/home/user", 20), "/home/user");
        assert_eq!(truncate_left("/home/user/projects/sgt", 10), "...cts/sgt");
        assert_eq!(truncate_left("/abc", 2), "..");
    }
}
