//! `PALAVER` command tokenisation.
//!
//! ```text
//! PALAVER IDENTIFY <token> <version> [<network-id>]
//! PALAVER BEGIN <token> <version>
//! PALAVER END
//! PALAVER SET <key> <value...>
//! PALAVER ADD <key> <value...>
//! PALAVER BACKGROUND | FOREGROUND
//! ```
//!
//! The command word and sub-command are case-insensitive. `SET` and `ADD`
//! values take the rest of the line, spaces included.

use crate::error::{HandlerError, HandlerResult};

/// Command word claimed by this module.
pub const PALAVER_COMMAND: &str = "PALAVER";

/// Client capability the host advertises so clients know to send `PALAVER`.
pub const PALAVER_CAPABILITY: &str = "palaverapp.com";

/// Line sent to a connection whose device must renegotiate.
pub const RENEGOTIATE_REQUEST: &str = "PALAVER REQ *";

/// A parsed `PALAVER` sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PalaverCommand {
    Identify {
        token: String,
        version: String,
        /// The client's own identifier for the network this connection is on.
        network_id: Option<String>,
    },
    Begin { token: String, version: String },
    End,
    Set { key: String, value: String },
    Add { key: String, value: String },
    Background,
    Foreground,
}

impl PalaverCommand {
    /// Parse a raw client line.
    ///
    /// Returns `None` if the line is not a `PALAVER` command at all, so the
    /// caller can pass it on. Malformed `PALAVER` lines yield `Some(Err(_))`.
    pub fn parse(line: &str) -> Option<HandlerResult<Self>> {
        let mut rest = line.trim_end_matches(['\r', '\n']);
        let command = next_word(&mut rest)?;
        if !command.eq_ignore_ascii_case(PALAVER_COMMAND) {
            return None;
        }
        Some(Self::parse_subcommand(rest))
    }

    fn parse_subcommand(mut rest: &str) -> HandlerResult<Self> {
        let sub = next_word(&mut rest).ok_or(HandlerError::NeedMoreParams("PALAVER"))?;
        let sub = sub.to_ascii_uppercase();

        let command = match sub.as_str() {
            "IDENTIFY" => {
                let (token, version) = token_and_version(&mut rest, "IDENTIFY")?;
                Self::Identify {
                    token,
                    version,
                    network_id: next_word(&mut rest).map(str::to_string),
                }
            }
            "BEGIN" => {
                let (token, version) = token_and_version(&mut rest, "BEGIN")?;
                Self::Begin { token, version }
            }
            "END" => Self::End,
            "SET" => {
                let key = next_word(&mut rest).ok_or(HandlerError::NeedMoreParams("SET"))?;
                Self::Set {
                    key: key.to_string(),
                    value: remainder(rest),
                }
            }
            "ADD" => {
                let key = next_word(&mut rest).ok_or(HandlerError::NeedMoreParams("ADD"))?;
                Self::Add {
                    key: key.to_string(),
                    value: remainder(rest),
                }
            }
            "BACKGROUND" => Self::Background,
            "FOREGROUND" => Self::Foreground,
            _ => return Err(HandlerError::UnknownSubcommand(sub)),
        };
        Ok(command)
    }

    /// Sub-command name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identify { .. } => "IDENTIFY",
            Self::Begin { .. } => "BEGIN",
            Self::End => "END",
            Self::Set { .. } => "SET",
            Self::Add { .. } => "ADD",
            Self::Background => "BACKGROUND",
            Self::Foreground => "FOREGROUND",
        }
    }
}

/// Keys accepted by `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Version,
    PushEndpoint,
}

impl SettingKey {
    pub fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("VERSION") {
            Some(Self::Version)
        } else if key.eq_ignore_ascii_case("PUSH-ENDPOINT") {
            Some(Self::PushEndpoint)
        } else {
            None
        }
    }
}

fn token_and_version(rest: &mut &str, sub: &'static str) -> HandlerResult<(String, String)> {
    let token = next_word(rest).ok_or(HandlerError::NeedMoreParams(sub))?;
    let version = next_word(rest).ok_or(HandlerError::NeedMoreParams(sub))?;
    Ok((token.to_string(), version.to_string()))
}

/// Pop the next space-separated word, skipping runs of spaces.
fn next_word<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let trimmed = rest.trim_start_matches(' ');
    if trimmed.is_empty() {
        *rest = trimmed;
        return None;
    }
    let (word, tail) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    *rest = tail;
    Some(word)
}

fn remainder(rest: &str) -> String {
    rest.trim_start_matches(' ').to_string()
}
