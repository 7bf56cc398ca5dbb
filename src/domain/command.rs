//! Command-line token parsing
//!
//! Splits the free-form tokens following the program name into the target
//! cluster, the command phrase (`list regions`) and the flag map
//! (`-id region1`, `-j`, `-g=groupA,groupB`).

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::DomainError;

/// Value recorded for a flag that has no value token.
pub const BOOLEAN_VALUE: &str = "true";

/// Force JSON output.
pub const JSON_FLAG: &str = "j";
/// Comma separated group filter.
pub const GROUP_FLAG: &str = "g";
/// Username override.
pub const USER_FLAG: &str = "u";
/// Password override.
pub const PASSWORD_FLAG: &str = "p";
/// Request body, literal or `@file`.
pub const BODY_FLAGS: [&str; 2] = ["body", "d"];
/// Show the endpoint behind a command.
pub const HELP_FLAGS: [&str; 2] = ["h", "help"];

/// Flags consumed by the tool itself and never forwarded to the cluster.
const UNIVERSAL_FLAGS: [&str; 8] = ["j", "g", "u", "p", "body", "d", "h", "help"];

/// Strip the leading dashes of a flag token: `--id` → `id`.
pub fn bare_flag_name(token: &str) -> &str {
    token.trim_start_matches('-')
}

/// Check if a flag token is handled by the tool rather than the cluster.
pub fn is_universal_flag(token: &str) -> bool {
    UNIVERSAL_FLAGS.contains(&bare_flag_name(token))
}

/// Split a comma separated group list, dropping blanks.
pub fn parse_groups(csv: &str) -> BTreeSet<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

/// A command phrase with its flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Space-joined non-flag tokens preceding the first flag
    pub command: String,
    /// Flag token (dashes included) → value, `"true"` for boolean flags
    pub parameters: BTreeMap<String, String>,
}

impl ParsedCommand {
    /// Look up a flag by bare name, trying `-name` before `--name`.
    pub fn flag(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&format!("-{name}"))
            .or_else(|| self.parameters.get(&format!("--{name}")))
            .map(String::as_str)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }

    pub fn wants_json(&self) -> bool {
        self.has_flag(JSON_FLAG)
    }

    pub fn wants_help(&self) -> bool {
        HELP_FLAGS.iter().any(|f| self.has_flag(f))
    }

    /// Groups requested with `-g`, if any.
    pub fn group_filter(&self) -> Option<BTreeSet<String>> {
        self.flag(GROUP_FLAG).map(parse_groups)
    }

    /// Request body flag value (`-body` or `-d`).
    pub fn body(&self) -> Option<&str> {
        BODY_FLAGS.iter().find_map(|f| self.flag(f))
    }

    /// Flags not consumed by the tool, as `(bare name, value)` pairs.
    pub fn forwarded_flags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .filter(|(flag, _)| !is_universal_flag(flag))
            .map(|(flag, value)| (bare_flag_name(flag), value.as_str()))
    }

    /// Flatten back into tokens: command words, then `-flag value` or `-flag`.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.command.split_whitespace().map(String::from).collect();
        for (flag, value) in &self.parameters {
            tokens.push(flag.clone());
            if value != BOOLEAN_VALUE {
                tokens.push(value.clone());
            }
        }
        tokens
    }
}

/// Target and command of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub target: String,
    pub command: ParsedCommand,
}

/// Resolve the target and parse the remaining tokens.
///
/// With a default target, the first token is only taken as the target when it
/// equals the default; any other first token starts the command phrase and the
/// default becomes the target.
pub fn tokenize<S: AsRef<str>>(
    args: &[S],
    default_target: Option<&str>,
) -> Result<Invocation, DomainError> {
    let default_target = default_target.filter(|t| !t.is_empty());
    let first: Option<&str> = args.first().map(|a| a.as_ref());

    let (target, rest) = match (default_target, first) {
        (None, None) => return Err(DomainError::MissingTarget),
        (None, Some(first)) => (first.to_string(), &args[1..]),
        (Some(default), Some(first)) if first == default => (default.to_string(), &args[1..]),
        (Some(default), _) => (default.to_string(), args),
    };

    let command = parse_command(rest)?;
    if command.command.is_empty() {
        return Err(DomainError::MissingCommand { target });
    }
    Ok(Invocation { target, command })
}

/// Parse command words and flags.
pub fn parse_command<S: AsRef<str>>(tokens: &[S]) -> Result<ParsedCommand, DomainError> {
    let mut words: Vec<&str> = Vec::new();
    let mut parameters = BTreeMap::new();
    let mut pending: Option<&str> = None;
    let mut seen_flag = false;

    for token in tokens {
        let token: &str = token.as_ref();
        if token.starts_with('-') {
            if let Some(flag) = pending.take() {
                parameters.insert(flag.to_string(), BOOLEAN_VALUE.to_string());
            }
            seen_flag = true;
            match token.split_once('=') {
                Some((flag, value)) => {
                    parameters.insert(flag.to_string(), value.to_string());
                }
                None => pending = Some(token),
            }
        } else if let Some(flag) = pending.take() {
            parameters.insert(flag.to_string(), token.to_string());
        } else if seen_flag {
            return Err(DomainError::UnexpectedArgument {
                token: token.to_string(),
            });
        } else {
            words.push(token);
        }
    }
    if let Some(flag) = pending {
        parameters.insert(flag.to_string(), BOOLEAN_VALUE.to_string());
    }

    Ok(ParsedCommand {
        command: words.join(" ").trim().to_string(),
        parameters,
    })
}
