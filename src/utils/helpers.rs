//! Helpers for sgt.
//!
//! - Color parsing from strings or hex codes
//! - Generating unused filenames to prevent accidental overwrite
//! - Recursive copies
//! - Displaying and expanding the home directory as "~"
//! - Reading the current git branch
//! - Deciding whether a file is text before handing it to a viewer

use ratatui::style::Color;
use std::io::Read;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};
use std::{fs, io};

/// Bytes inspected when looking for a NUL byte.
const TEXT_SNIFF_LEN: usize = 8192;
/// Files larger than this are never treated as text.
const MAX_TEXT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Parses a string (color name or hex) into a ratatui::style::color
///
/// Supports standard names (red, green, etc.) as well as hex values (#RRGGBB or #RGB)
pub fn parse_color(s: &str) -> Color {
    match s.to_lowercase().as_str() {
        "default" | "reset" => Color::Reset,
        "yellow" => Color::Yellow,
        "red" => Color::Red,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "black" => Color::Black,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        _ => {
            if let Some(hex) = s.strip_prefix('#') {
                let expanded = match hex.len() {
                    6 => Some(hex.to_string()),
                    3 => Some(hex.chars().flat_map(|c| [c, c]).collect()),
                    _ => None,
                };
                if let Some(rgb) = expanded.and_then(|h| u32::from_str_radix(&h, 16).ok()) {
                    return Color::Rgb(
                        ((rgb >> 16) & 0xFF) as u8,
                        ((rgb >> 8) & 0xFF) as u8,
                        (rgb & 0xFF) as u8,
                    );
                }
            }
            // fallback
            Color::Reset
        }
    }
}

/// Finds the next available filename by appending _1, _2, etc. if the target exists
///
/// Example: "notes.txt" -> "notes_1.txt"
pub fn get_unused_path(path: &Path) -> PathBuf {
    if fs::symlink_metadata(path).is_err() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path.file_name().unwrap_or_default();

    let stem = Path::new(name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let ext = Path::new(name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let target = parent.join(format!("{stem}_{counter}{ext}"));
        if fs::symlink_metadata(&target).is_err() {
            return target;
        }
        counter += 1;
    }
}

/// Recursively copies files and directories from `src` to `dest`.
///
/// Symlinks are copied as links on unix rather than followed.
pub fn copy_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(src)?;

    #[cfg(unix)]
    {
        if meta.file_type().is_symlink() {
            let target = fs::read_link(src)?;
            return std::os::unix::fs::symlink(target, dest);
        }
    }

    if meta.is_dir() || (meta.file_type().is_symlink() && src.is_dir()) {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_recursive(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

/// Shortens the home directory prefix of `path` to `~`.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", MAIN_SEPARATOR, stripped.display());
    }
    path.display().to_string()
}

/// Expands a leading `~` to the home directory. Other paths are returned unchanged.
pub fn expand_home_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if let Some(home) = dirs::home_dir() {
        if raw == "~" {
            return home;
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Returns the branch name checked out in the repository containing `dir`.
///
/// Reads `.git/HEAD` in `dir` or its closest ancestor that has one. A detached HEAD
/// yields the abbreviated commit hash.
pub fn git_branch(dir: &Path) -> Option<String> {
    let head = dir
        .ancestors()
        .map(|d| d.join(".git").join("HEAD"))
        .find(|p| p.is_file())?;
    let content = fs::read_to_string(head).ok()?;
    let content = content.trim();

    match content.strip_prefix("ref: ") {
        Some(reference) => reference
            .rsplit_once("refs/heads/")
            .map(|(_, branch)| branch.to_string())
            .or_else(|| Some(reference.to_string())),
        None if !content.is_empty() => Some(content.chars().take(7).collect()),
        None => None,
    }
}

/// Whether `path` looks like a text file: at most 50 MiB and no NUL byte in its head.
pub fn is_text_file(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() || meta.len() > MAX_TEXT_FILE_SIZE {
        return false;
    }

    let Ok(file) = fs::File::open(path) else {
        return false;
    };
    let mut head = Vec::with_capacity(TEXT_SNIFF_LEN);
    if file.take(TEXT_SNIFF_LEN as u64).read_to_end(&mut head).is_err() {
        return false;
    }
    !head.contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_path_collision_increments() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("data.csv");

        assert_eq!(get_unused_path(&path), path);

        File::create(&path)?;
        assert_eq!(get_unused_path(&path), dir.path().join("data_1.csv"));

        File::create(dir.path().join("data_1.csv"))?;
        assert_eq!(get_unused_path(&path), dir.path().join("data_2.csv"));
        Ok(())
    }

    #[test]
    fn unique_name_skips_taken_suffixes() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        for name in ["test.txt", "test_1.txt", "test_2.txt"] {
            File::create(dir.path().join(name))?;
        }
        assert_eq!(
            get_unused_path(&dir.path().join("test.txt")),
            dir.path().join("test_3.txt")
        );
        Ok(())
    }

    #[test]
    fn test_get_unused_path_hidden_and_bare() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let dot_file = dir.path().join(".gitignore");
        let folder = dir.path().join("my_folder");
        File::create(&dot_file)?;
        fs::create_dir(&folder)?;

        assert_eq!(get_unused_path(&dot_file), dir.path().join(".gitignore_1"));
        assert_eq!(get_unused_path(&folder), dir.path().join("my_folder_1"));
        Ok(())
    }

    #[test]
    fn test_get_unused_path_complex_extension() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let tar_gz = dir.path().join("archive.tar.gz");
        File::create(&tar_gz)?;

        assert_eq!(get_unused_path(&tar_gz), dir.path().join("archive.tar_1.gz"));
        Ok(())
    }

    #[test]
    fn colors_from_names_and_hex() {
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_color("#12"), Color::Reset);
        assert_eq!(parse_color("nonsense"), Color::Reset);
    }

    #[test]
    fn home_shortening_and_expansion() -> Result<(), Box<dyn error::Error>> {
        let home = dirs::home_dir().ok_or("no home directory")?;
        assert_eq!(shorten_home_path(&home), "~");
        assert_eq!(
            shorten_home_path(home.join("docs")),
            format!("~{MAIN_SEPARATOR}docs")
        );
        assert_eq!(expand_home_path("~"), home);
        assert_eq!(expand_home_path("~/docs"), home.join("docs"));
        assert_eq!(expand_home_path("/tmp"), PathBuf::from("/tmp"));
        Ok(())
    }

    #[test]
    fn copy_recursive_nested() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("a/b"))?;
        fs::write(src.join("a/b/c.txt"), "deep")?;

        let dest = dir.path().join("dest");
        copy_recursive(&src, &dest)?;
        assert_eq!(fs::read_to_string(dest.join("a/b/c.txt"))?, "deep");
        Ok(())
    }

    #[test]
    fn git_branch_from_head() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let git = dir.path().join(".git");
        fs::create_dir(&git)?;
        fs::write(git.join("HEAD"), "ref: refs/heads/feature/cache\n")?;

        let nested = dir.path().join("src/core");
        fs::create_dir_all(&nested)?;
        assert_eq!(git_branch(&nested).as_deref(), Some("feature/cache"));

        fs::write(git.join("HEAD"), "0123456789abcdef\n")?;
        assert_eq!(git_branch(dir.path()).as_deref(), Some("0123456"));
        Ok(())
    }

    #[test]
    fn text_detection() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let text = dir.path().join("notes.md");
        fs::write(&text, "# title\nbody\n")?;
        let binary = dir.path().join("blob.bin");
        let mut f = File::create(&binary)?;
        f.write_all(&[0x7f, b'E', b'L', b'F', 0, 1, 2])?;

        assert!(is_text_file(&text));
        assert!(!is_text_file(&binary));
        assert!(!is_text_file(dir.path()));
        assert!(!is_text_file(&dir.path().join("missing")));
        Ok(())
    }
}
