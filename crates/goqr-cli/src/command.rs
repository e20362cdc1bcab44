//! Command-line parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

pub const USAGE: &str = "\
goqr - branded QR codes for go-links

USAGE:
    goqr <COMMAND> [OPTIONS]

COMMANDS:
    login [--user <USER>]                  Save GitHub credentials after checking them
    logout                                 Forget saved credentials
    list                                   List link slugs
    usage                                  Show the remaining API quota
    generate <SLUG> [--out <DIR>] [--stdout]
                                           Write tedxwarwick-qrcode-<SLUG>.svg
    help                                   Show this message

ENVIRONMENT:
    GOQR_USER, GOQR_TOKEN                  Credentials for a non-interactive login
    GOQR_API_BASE, GOQR_REPO, GOQR_LINKS_PATH, GOQR_REDIRECT_BASE,
    GOQR_ACCENT, GOQR_STORAGE, GOQR_OUTPUT_DIR, GOQR_LOG_DIR
    RUST_LOG                               Log filter (default: warn)
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Login { user: Option<String> },
    Logout,
    List,
    Usage,
    Generate {
        slug: String,
        out_dir: Option<PathBuf>,
        to_stdout: bool,
    },
}

impl Command {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let Some(name) = args.next() else {
            return Ok(Command::Help);
        };

        match name.as_str() {
            "help" | "-h" | "--help" => Ok(Command::Help),
            "login" => {
                let mut user = None;
                while let Some(arg) = args.next() {
                    match arg.as_str() {
                        "--user" | "-u" => user = Some(option_value(&mut args, &arg)?),
                        other => bail!("Unexpected argument to login: {}", other),
                    }
                }
                Ok(Command::Login { user })
            }
            "logout" => no_more_args(args, Command::Logout),
            "list" => no_more_args(args, Command::List),
            "usage" => no_more_args(args, Command::Usage),
            "generate" => {
                let mut slug = None;
                let mut out_dir = None;
                let mut to_stdout = false;
                while let Some(arg) = args.next() {
                    if arg == "--out" || arg == "-o" {
                        out_dir = Some(PathBuf::from(option_value(&mut args, &arg)?));
                    } else if arg == "--stdout" {
                        to_stdout = true;
                    } else if arg.starts_with('-') {
                        bail!("Unknown option: {}", arg);
                    } else if slug.is_some() {
                        bail!("Only one slug may be given");
                    } else {
                        slug = Some(arg);
                    }
                }
                let slug = slug
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| anyhow!("generate needs a slug"))?;
                Ok(Command::Generate {
                    slug,
                    out_dir,
                    to_stdout,
                })
            }
            other => bail!("Unknown command: {} (try `goqr help`)", other),
        }
    }
}

fn option_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

fn no_more_args(mut args: impl Iterator<Item = String>, command: Command) -> Result<Command> {
    match args.next() {
        Some(extra) => bail!("Unexpected argument: {}", extra),
        None => Ok(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse(Vec::<String>::new()).unwrap(), Command::Help);
        assert_eq!(Command::parse(["--help"]).unwrap(), Command::Help);
        assert_eq!(Command::parse(["list"]).unwrap(), Command::List);
        assert_eq!(Command::parse(["usage"]).unwrap(), Command::Usage);
        assert_eq!(Command::parse(["logout"]).unwrap(), Command::Logout);
        assert!(Command::parse(["list", "extra"]).is_err());
        assert!(Command::parse(["frobnicate"]).is_err());
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(Command::parse(["login"]).unwrap(), Command::Login { user: None });
        assert_eq!(
            Command::parse(["login", "--user", "octocat"]).unwrap(),
            Command::Login {
                user: Some("octocat".to_string())
            }
        );
        assert!(Command::parse(["login", "--user"]).is_err());
    }

    #[test]
    fn test_parse_generate() {
        assert_eq!(
            Command::parse(["generate", "tickets"]).unwrap(),
            Command::Generate {
                slug: "tickets".to_string(),
                out_dir: None,
                to_stdout: false
            }
        );
        assert_eq!(
            Command::parse(["generate", "-o", "/tmp/qr", "tickets", "--stdout"]).unwrap(),
            Command::Generate {
                slug: "tickets".to_string(),
                out_dir: Some(PathBuf::from("/tmp/qr")),
                to_stdout: true
            }
        );
        assert!(Command::parse(["generate"]).is_err());
        assert!(Command::parse(["generate", "a", "b"]).is_err());
        assert!(Command::parse(["generate", "a", "--bogus"]).is_err());
    }
}
