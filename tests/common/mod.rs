//! Shared setup for integration tests.

#![allow(dead_code)]

use airline_console::console::Console;
use airline_console::core::db::{ConnectOptions, ConnectionHandle, Credentials, Endpoint};
use std::io::Cursor;
use tempfile::TempDir;

pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// On-disk airline database in a temporary directory.
pub struct TestDatabase {
    pub dir: TempDir,
    pub handle: ConnectionHandle,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("airline.db");
        let options = ConnectOptions {
            bootstrap_schema: true,
            ..ConnectOptions::default()
        };
        let handle = ConnectionHandle::open(
            Endpoint::new("localhost", 5432, path.to_string_lossy()),
            Credentials::new("tester", ""),
            &options,
        )
        .unwrap();
        TestDatabase { dir, handle }
    }

    pub fn seed(&self, sql: &str) {
        self.handle.connection().unwrap().execute_batch(sql).unwrap();
    }
}

pub fn scripted(input: &str) -> ScriptedConsole {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn written(console: ScriptedConsole) -> String {
    String::from_utf8(console.into_inner().1).unwrap()
}
