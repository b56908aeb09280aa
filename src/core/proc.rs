//! The sgt processes module.
//!
//! Hands the terminal to external programs: the editor, a read-only viewer, fzf for
//! search and shell commands. Each call suspends the TUI (raw mode off, alternate screen
//! left), runs the program in the foreground and restores the TUI afterwards. The caller
//! redraws and calls [AppState::after_external](crate::app::AppState::after_external) once
//! it gets control back.
//!
//! Tool detection uses the `which` crate.

use crate::config::Editor;
use crate::utils::is_text_file;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::ffi::OsString;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Directories never offered to the search.
#[rustfmt::skip]
const EXCLUDES: &[&str] = &[
    ".git", ".hg", ".svn", "node_modules", "target", "__pycache__", ".venv",
];

/// Upper bound on paths fed to fzf, so huge trees do not stall the UI.
const MAX_SEARCH_PATHS: usize = 200_000;

const RULE_WIDTH: usize = 80;

/// A program with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
}

impl ExternalCommand {
    fn new(program: &str, args: &[&str], path: &Path) -> Self {
        let mut all: Vec<OsString> = args.iter().map(OsString::from).collect();
        all.push(path.as_os_str().to_os_string());
        Self {
            program: program.to_string(),
            args: all,
        }
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    fn status(&self) -> io::Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdout(terminal_stdout())
            .status()?;
        if !status.success() {
            tracing::debug!(
                program = %self.program,
                ?status,
                "external program exited with failure"
            );
        }
        Ok(())
    }
}

/// Stdout for interactive programs. sgt's own stdout is usually captured by the shell
/// wrapper, so the controlling terminal is used when there is one.
fn terminal_stdout() -> Stdio {
    #[cfg(unix)]
    {
        if let Ok(tty) = fs::OpenOptions::new().write(true).open("/dev/tty") {
            return Stdio::from(tty);
        }
    }
    Stdio::inherit()
}

fn available(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Leaves the TUI, runs `f`, then restores the TUI even if `f` failed.
pub fn with_suspended_terminal<T>(f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
    let mut stderr = io::stderr();
    disable_raw_mode()?;
    execute!(stderr, LeaveAlternateScreen, Show)?;

    let result = f();

    execute!(stderr, EnterAlternateScreen, Hide)?;
    enable_raw_mode()?;
    result
}

/// Picks the read-only viewer for `path`.
///
/// Markdown goes to `glow -p` when installed and to `less` otherwise. Other files open
/// read-only in the first of nvim, vim, vi and nano, with `less` as the last resort.
/// Returns `None` for files that do not look like text.
pub fn viewer_for(path: &Path) -> Option<ExternalCommand> {
    if !is_text_file(path) {
        return None;
    }

    let is_markdown = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("md"));
    let less = || ExternalCommand::new("less", &["-R", "-F", "-X"], path);

    if is_markdown {
        if available("glow") {
            return Some(ExternalCommand::new("glow", &["-p"], path));
        }
        return Some(less());
    }

    let candidates: [(&str, &[&str]); 4] = [
        ("nvim", &["-R"]),
        ("vim", &["-R"]),
        ("vi", &["-R"]),
        ("nano", &["-v"]),
    ];
    let viewer = candidates
        .iter()
        .find(|(program, _)| available(program))
        .map(|(program, args)| ExternalCommand::new(program, args, path))
        .unwrap_or_else(less);
    Some(viewer)
}

/// Opens `path` in the configured editor.
///
/// The editor setting may carry arguments, e.g. `code -w`.
pub fn edit(editor: &Editor, path: &Path) -> io::Result<()> {
    let cmd = editor.cmd();
    let mut parts = cmd.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no editor configured"))?;
    let args: Vec<&str> = parts.collect();

    tracing::info!(editor = program, file = %path.display(), "opening editor");
    with_suspended_terminal(|| ExternalCommand::new(program, &args, path).status())
}

/// Shows `path` in a read-only viewer. Non-text files are refused before the terminal is
/// touched.
pub fn view(path: &Path) -> io::Result<()> {
    let viewer = viewer_for(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            "Cannot preview: not a text file or too large (>50MB)",
        )
    })?;

    tracing::info!(viewer = viewer.program(), file = %path.display(), "opening viewer");
    with_suspended_terminal(|| viewer.status())
}

/// Collects every file and directory below `dir`, skipping [EXCLUDES] and not following
/// symlinked directories.
pub fn search_candidates(dir: &Path, limit: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        let Ok(read) = fs::read_dir(&current) else {
            continue;
        };
        for entry in read.flatten() {
            if out.len() >= limit {
                return out;
            }
            let name = entry.file_name();
            if EXCLUDES.iter().any(|ex| name == *ex) {
                continue;
            }
            let path = entry.path();
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                stack.push(path.clone());
            }
            out.push(path);
        }
    }
    out
}

/// Lets the user pick a path below `dir` with fzf.
///
/// Returns `Ok(None)` when fzf was closed without a choice.
pub fn search(dir: &Path) -> io::Result<Option<PathBuf>> {
    if !available("fzf") {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "fzf not found in PATH, search is unavailable",
        ));
    }

    let candidates = search_candidates(dir, MAX_SEARCH_PATHS);
    tracing::debug!(count = candidates.len(), dir = %dir.display(), "starting fzf");

    let output = with_suspended_terminal(|| {
        let mut child = Command::new("fzf")
            .args(["--height=40%", "--reverse", "--prompt=Search: "])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut buf = String::new();
            for path in &candidates {
                buf.push_str(&path.to_string_lossy());
                buf.push('\n');
            }
            // fzf may exit before reading everything.
            if let Err(e) = stdin.write_all(buf.as_bytes())
                && e.kind() != io::ErrorKind::BrokenPipe
            {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
        child.wait_with_output()
    })?;

    let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || selected.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(selected)))
}

/// The shell used for `:` commands: `$SHELL`, or `sh` when it is unset.
pub fn user_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "sh".to_string())
}

/// Runs `command` with `shell -c` in `dir`. Output goes to the terminal.
fn shell_status(shell: &str, command: &str, dir: &Path) -> io::Result<ExitStatus> {
    Command::new(shell)
        .arg("-c")
        .arg(command)
        .current_dir(dir)
        .stdout(terminal_stdout())
        .status()
}

/// Runs a shell command in `dir` outside the TUI and waits for Enter before returning.
///
/// A command that exits with a failure is not an error; the status is returned so the
/// caller can report it. Failing to start the shell is.
pub fn run_shell(command: &str, dir: &Path) -> io::Result<ExitStatus> {
    let shell = user_shell();
    tracing::info!(%shell, command, dir = %dir.display(), "running shell command");

    with_suspended_terminal(|| {
        let rule = "─".repeat(RULE_WIDTH);
        let mut stderr = io::stderr();
        writeln!(stderr, "Executing: {command}\n{rule}\n")?;

        let result = shell_status(&shell, command, dir);
        if let Err(e) = &result {
            writeln!(stderr, "\nError: {e}")?;
        }

        writeln!(stderr, "\n{rule}\nPress Enter to continue...")?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        result
    })
}
