//! Command-line argument parsing and help for sgt.
//!
//! This module handles the few flags sgt takes. Parsing is split from acting on the result
//! so it can be tested without touching the process environment.
//!
//! When invoked with no args/flags (sgt), sgt simply launches the TUI in the current directory.

use crate::config::Config;

/// Options for a normal run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub path: Option<String>,
    pub restore: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Run(CliArgs),
    Help,
    Version,
    Init,
    Error(String),
}

/// Parses the arguments following the program name.
pub fn parse_args<I, S>(args: I) -> CliAction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = CliArgs::default();

    for arg in args {
        match arg.as_ref() {
            "-h" | "--help" => return CliAction::Help,
            "-v" | "--version" => return CliAction::Version,
            "--init" => return CliAction::Init,
            "--restore" => parsed.restore = true,
            "--no-color" => parsed.no_color = true,
            arg if arg.starts_with('-') && arg != "-" => {
                return CliAction::Error(format!("Unknown argument: {arg}"));
            }
            arg if arg.trim().is_empty() => {}
            arg => {
                if parsed.path.is_some() {
                    return CliAction::Error("sgt accepts only one path".to_string());
                }
                parsed.path = Some(arg.to_string());
            }
        }
    }

    CliAction::Run(parsed)
}

/// Parses the process arguments and handles the flags that do not start the TUI.
///
/// Returns the run options, or `None` when sgt should exit right away. `Err` carries the
/// message for an invalid command line.
pub fn handle_args() -> Result<Option<CliArgs>, String> {
    match parse_args(std::env::args().skip(1)) {
        CliAction::Run(args) => Ok(Some(args)),
        CliAction::Help => {
            print_help();
            Ok(None)
        }
        CliAction::Version => {
            println!("sgt {}", env!("CARGO_PKG_VERSION"));
            Ok(None)
        }
        CliAction::Init => {
            Config::generate_default(&Config::default_path()).map_err(|e| e.to_string())?;
            Ok(None)
        }
        CliAction::Error(msg) => Err(format!("{msg}\nTry --help for available options")),
    }
}

fn print_help() {
    println!(
        r#"sgt - keyboard-driven terminal directory navigator

USAGE:
  sgt [OPTIONS] [PATH]

PATH:
  Directory to open (defaults to the current directory)

OPTIONS:
      --restore           Start in the directory the last session ended in
      --no-color          Disable colors
      --init              Generate the default configuration file
  -h, --help              Print help information
  -v, --version           Print the installed version

On quit, sgt prints the current directory on stdout, so a shell function can cd into it:
  s() {{ cd "$(command sgt "$@")" || return; }}

ENVIRONMENT:
  SGT_CONFIG              Override the default config path
  SGT_LOG                 Log filter (for example "debug")
  EDITOR, VISUAL          Editor used for the edit key
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_runs_in_cwd() {
        assert_eq!(parse_args(Vec::<String>::new()), CliAction::Run(CliArgs::default()));
    }

    #[test]
    fn flags_and_path_combine() {
        let action = parse_args(["--no-color", "~/src", "--restore"]);
        assert_eq!(
            action,
            CliAction::Run(CliArgs {
                path: Some("~/src".into()),
                restore: true,
                no_color: true,
            })
        );
    }

    #[test]
    fn info_flags_win() {
        assert_eq!(parse_args(["/tmp", "--help"]), CliAction::Help);
        assert_eq!(parse_args(["-v"]), CliAction::Version);
        assert_eq!(parse_args(["--init"]), CliAction::Init);
    }

    #[test]
    fn rejects_unknown_flags_and_second_path() {
        assert!(matches!(parse_args(["--frobnicate"]), CliAction::Error(_)));
        assert!(matches!(parse_args(["/a", "/b"]), CliAction::Error(_)));
    }
}
