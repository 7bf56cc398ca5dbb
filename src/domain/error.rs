//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed user input.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing target: expected `<target> <command> [options]`")]
    MissingTarget,

    #[error("missing command for target {target}: use `{target} commands` to list commands")]
    MissingCommand { target: String },

    #[error("unexpected argument '{token}' after options: command words must come before options")]
    UnexpectedArgument { token: String },

    #[error("you did not specify your password: use -u=<username> -p=<password>")]
    UsernameWithoutPassword,

    #[error("you did not specify your username: use -u=<username> -p=<password>")]
    PasswordWithoutUsername,
}
