//! The menu state machine.
//!
//! ```text
//! Anonymous --1--> Anonymous            (create account)
//! Anonymous --2--> Authenticated(role)  (login succeeded)
//! Anonymous --2--> Anonymous            (login failed)
//! Anonymous --9--> Terminated
//! Authenticated(role) --N--> Authenticated(role)   (operation N, if the role holds it)
//! Authenticated(role) --20--> Anonymous            (log out)
//! ```
//!
//! End of input terminates from any state. Operation failures are printed
//! and the loop carries on.

use crate::auth::{self, Session};
use crate::authz::AuthorizationTable;
use crate::console::Console;
use crate::core::db::StatementExecutor;
use crate::core::{ConsoleError, Result};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

pub const CREATE_USER_CHOICE: u32 = 1;
pub const LOGIN_CHOICE: u32 = 2;
pub const EXIT_CHOICE: u32 = 9;
pub const LOGOUT_CHOICE: u32 = 20;

pub const UNRECOGNIZED_CHOICE: &str = "Unrecognized choice!";

pub const GREETING: &str = "\n\n*******************************************************\n              User Interface\n*******************************************************\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Anonymous,
    Authenticated(Session),
    Terminated,
}

pub struct Dispatcher<'a, R, W> {
    executor: StatementExecutor<'a>,
    console: Console<R, W>,
    authz: AuthorizationTable,
    state: MenuState,
}

impl<'a, R: BufRead, W: Write> Dispatcher<'a, R, W> {
    pub fn new(connection: &'a Connection, console: Console<R, W>, authz: AuthorizationTable) -> Self {
        Dispatcher {
            executor: StatementExecutor::new(connection),
            console,
            authz,
            state: MenuState::Anonymous,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// Runs menus until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        self.console.say(GREETING)?;
        while self.state != MenuState::Terminated {
            self.step()?;
        }
        Ok(())
    }

    /// Shows the current menu, reads one choice, and acts on it.
    ///
    /// Only console I/O failures are returned; end of input moves the
    /// machine to `Terminated`.
    pub fn step(&mut self) -> Result<()> {
        let current = std::mem::replace(&mut self.state, MenuState::Terminated);
        let next = match current {
            MenuState::Anonymous => self.anonymous_step(),
            MenuState::Authenticated(session) => self.authenticated_step(session),
            MenuState::Terminated => Ok(MenuState::Terminated),
        };
        self.state = match next {
            Ok(state) => state,
            Err(ConsoleError::InputClosed) => {
                info!("input closed, leaving menus");
                MenuState::Terminated
            }
            Err(e) => return Err(e),
        };
        Ok(())
    }

    /// Renders the menu for an authenticated role from the authorization table.
    pub fn role_menu(&self, session: &Session) -> String {
        let mut menu = String::from("MAIN MENU\n---------\n");
        for (choice, operation) in self.authz.permitted(session.role) {
            menu.push_str(&format!("{}. {}\n", choice, operation.title()));
        }
        menu.push_str(&format!("{}. Log out", LOGOUT_CHOICE));
        menu
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    fn anonymous_step(&mut self) -> Result<MenuState> {
        self.console.say(&format!(
            "MAIN MENU\n---------\n{}. Create user\n{}. Log in\n{}. < EXIT",
            CREATE_USER_CHOICE, LOGIN_CHOICE, EXIT_CHOICE
        ))?;

        match self.console.read_choice()? {
            CREATE_USER_CHOICE => {
                if let Err(e) = auth::create_account(&self.executor, &mut self.console) {
                    self.recover(e)?;
                }
                Ok(MenuState::Anonymous)
            }
            LOGIN_CHOICE => match auth::login(&self.executor, &mut self.console) {
                Ok(Some(session)) => Ok(MenuState::Authenticated(session)),
                Ok(None) => Ok(MenuState::Anonymous),
                Err(e) => {
                    self.recover(e)?;
                    Ok(MenuState::Anonymous)
                }
            },
            EXIT_CHOICE => Ok(MenuState::Terminated),
            other => {
                debug!(choice = other, "unrecognized choice");
                self.console.say(UNRECOGNIZED_CHOICE)?;
                Ok(MenuState::Anonymous)
            }
        }
    }

    fn authenticated_step(&mut self, session: Session) -> Result<MenuState> {
        let menu = self.role_menu(&session);
        self.console.say(&menu)?;

        let choice = self.console.read_choice()?;
        if choice == LOGOUT_CHOICE {
            info!(username = %session.username, "logged out");
            return Ok(MenuState::Anonymous);
        }

        match self.authz.check(session.role, choice) {
            Ok(Some(operation)) => {
                debug!(username = %session.username, ?operation, "running operation");
                if let Err(e) = operation.run(&self.executor, &mut self.console) {
                    self.recover(e)?;
                }
            }
            Ok(None) => self.console.say(UNRECOGNIZED_CHOICE)?,
            Err(e) => self.recover(e)?,
        }
        Ok(MenuState::Authenticated(session))
    }

    /// Reports a failed operation to the user. Errors that mean the console
    /// itself is gone are passed back up.
    fn recover(&mut self, err: ConsoleError) -> Result<()> {
        match err {
            ConsoleError::InputClosed | ConsoleError::Io(_) => Err(err),
            other => {
                warn!("operation failed: {}", other);
                self.console.say(&other.to_string())
            }
        }
    }
}
