//! Account creation and login against the `UserAccount` table.
//!
//! Passwords are stored and compared as plaintext.

use crate::console::Console;
use crate::core::db::StatementExecutor;
use crate::core::{ConsoleError, Result};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{info, warn};

pub const INVALID_ROLE: &str = "Invalid role. Please enter a valid role.";
pub const LOGIN_FAILED: &str = "Login failed: Invalid username or password.";

/// Capability level of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Management,
    Customer,
    Pilot,
    Technician,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Management, Role::Customer, Role::Pilot, Role::Technician];

    /// Title-case name, as stored in `UserAccount.Role`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Management => "Management",
            Role::Customer => "Customer",
            Role::Pilot => "Pilot",
            Role::Technician => "Technician",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConsoleError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConsoleError::Validation(INVALID_ROLE.to_string()))
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// Result of checking a username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(Role),
    /// No account matched
    NoMatch,
    /// More than one account matched; the store should make this impossible
    Ambiguous(usize),
}

impl LoginOutcome {
    pub fn role(&self) -> Option<Role> {
        match self {
            LoginOutcome::Authenticated(role) => Some(*role),
            _ => None,
        }
    }
}

/// Inserts a new account. Duplicate usernames are rejected by the store and
/// surface as `ConsoleError::Sql`.
pub fn register_account(executor: &StatementExecutor, username: &str, password: &str, role: Role) -> Result<()> {
    executor.execute_update(
        "INSERT INTO UserAccount (Username, Password, Role) VALUES (?1, ?2, ?3)",
        [username, password, role.as_str()],
    )?;
    info!(username, %role, "account created");
    Ok(())
}

/// Looks up the account matching both username and password.
pub fn authenticate(executor: &StatementExecutor, username: &str, password: &str) -> Result<LoginOutcome> {
    let records = executor.execute_query_records(
        "SELECT Role FROM UserAccount WHERE Username = ?1 AND Password = ?2",
        [username, password],
    )?;

    match records.as_slice() {
        [] => Ok(LoginOutcome::NoMatch),
        [record] => {
            let stored = record.first().map(String::as_str).unwrap_or_default();
            let role = stored.parse::<Role>().map_err(|_| {
                ConsoleError::Validation(format!("account {} has unknown role '{}'", username, stored))
            })?;
            Ok(LoginOutcome::Authenticated(role))
        }
        many => Ok(LoginOutcome::Ambiguous(many.len())),
    }
}

/// Interactive account creation.
///
/// The role prompt repeats until one of the four roles is entered, in any
/// casing; it is stored in title case.
pub fn create_account<R: BufRead, W: Write>(executor: &StatementExecutor, console: &mut Console<R, W>) -> Result<()> {
    let username = console.prompt("\tCreate Username: ")?;
    let password = console.prompt("\tCreate Password: ")?;
    let role = console.prompt_until("\tCreate Role (Management, Customer, Pilot, Technician): ", Role::from_str)?;

    register_account(executor, &username, &password, role)?;
    console.say(&format!("User {} created as {}.", username, role))?;
    Ok(())
}

/// Interactive login.
///
/// Returns `None` on failure; a missing account and an ambiguous match look
/// the same to the user.
pub fn login<R: BufRead, W: Write>(executor: &StatementExecutor, console: &mut Console<R, W>) -> Result<Option<Session>> {
    let username = console.prompt("\tEnter Username: ")?;
    let password = console.prompt("\tEnter Password: ")?;

    match authenticate(executor, &username, &password)? {
        LoginOutcome::Authenticated(role) => {
            info!(username = %username, %role, "login succeeded");
            console.say(&format!("\nLogin successful! Logged in as {}.", role))?;
            Ok(Some(Session { username, role }))
        }
        LoginOutcome::NoMatch => {
            info!(username = %username, "login failed: no matching account");
            console.say(LOGIN_FAILED)?;
            Ok(None)
        }
        LoginOutcome::Ambiguous(count) => {
            warn!(username = %username, count, "login failed: credentials matched several accounts");
            console.say(LOGIN_FAILED)?;
            Ok(None)
        }
    }
}
