/// Airline Schema Module
///
/// Table definitions for the airline operations database. The console does
/// not own the schema; these statements exist so an empty database file can be
/// brought up with `bootstrap_schema = true`, and so tests have a realistic
/// store to run against.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

/// Statements creating every airline table, each guarded by `IF NOT EXISTS`.
pub const AIRLINE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS UserAccount (
    Username TEXT PRIMARY KEY,
    Password TEXT NOT NULL,
    Role TEXT NOT NULL CHECK (Role IN ('Management', 'Customer', 'Pilot', 'Technician'))
);

CREATE TABLE IF NOT EXISTS Plane (
    PlaneID TEXT PRIMARY KEY,
    Make TEXT NOT NULL,
    Model TEXT NOT NULL,
    Year INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Flight (
    FlightNumber TEXT PRIMARY KEY,
    PlaneID TEXT REFERENCES Plane (PlaneID),
    DepartureCity TEXT NOT NULL,
    ArrivalCity TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Schedule (
    ScheduleID INTEGER PRIMARY KEY AUTOINCREMENT,
    FlightNumber TEXT NOT NULL REFERENCES Flight (FlightNumber),
    DayOfWeek TEXT NOT NULL,
    DepartureTime TEXT NOT NULL,
    ArrivalTime TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS FlightInstance (
    FlightInstanceID INTEGER PRIMARY KEY AUTOINCREMENT,
    FlightNumber TEXT NOT NULL REFERENCES Flight (FlightNumber),
    FlightDate DATE NOT NULL,
    DepartureTime TEXT,
    DepartedOnTime BOOLEAN,
    ArrivedOnTime BOOLEAN,
    SeatsTotal INTEGER NOT NULL DEFAULT 0,
    SeatsSold INTEGER NOT NULL DEFAULT 0,
    NumOfStops INTEGER NOT NULL DEFAULT 0,
    TicketCost REAL
);

CREATE TABLE IF NOT EXISTS Customer (
    CustomerID INTEGER PRIMARY KEY AUTOINCREMENT,
    FirstName TEXT NOT NULL,
    LastName TEXT NOT NULL,
    Gender TEXT,
    DOB DATE,
    Address TEXT,
    Phone TEXT,
    Zip TEXT
);

CREATE TABLE IF NOT EXISTS Reservation (
    ReservationID TEXT PRIMARY KEY,
    CustomerID INTEGER NOT NULL REFERENCES Customer (CustomerID),
    FlightInstanceID INTEGER NOT NULL REFERENCES FlightInstance (FlightInstanceID),
    Status TEXT NOT NULL CHECK (Status IN ('reserved', 'waitlist', 'flown'))
);

CREATE TABLE IF NOT EXISTS Technician (
    TechnicianID TEXT PRIMARY KEY,
    Name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS Pilot (
    PilotID TEXT PRIMARY KEY,
    Name TEXT NOT NULL,
    Airline TEXT
);

CREATE TABLE IF NOT EXISTS Repair (
    RepairID INTEGER PRIMARY KEY AUTOINCREMENT,
    PlaneID TEXT NOT NULL REFERENCES Plane (PlaneID),
    RepairCode TEXT NOT NULL,
    RepairDate DATE NOT NULL,
    TechnicianID TEXT REFERENCES Technician (TechnicianID)
);

CREATE TABLE IF NOT EXISTS MaintenanceRequest (
    RequestID INTEGER PRIMARY KEY AUTOINCREMENT,
    PlaneID TEXT NOT NULL REFERENCES Plane (PlaneID),
    RepairCode TEXT NOT NULL,
    RequestDate DATE NOT NULL,
    PilotID TEXT REFERENCES Pilot (PilotID)
);

CREATE INDEX IF NOT EXISTS idx_instance_flight_date ON FlightInstance (FlightNumber, FlightDate);
CREATE INDEX IF NOT EXISTS idx_repair_plane ON Repair (PlaneID, RepairDate);
CREATE INDEX IF NOT EXISTS idx_repair_technician ON Repair (TechnicianID);
"#;

/// Creates any missing airline tables.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(AIRLINE_SCHEMA)?;
    info!("airline schema ready");
    Ok(())
}

/// Checks whether a table with the given name exists.
pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        for table in [
            "UserAccount",
            "Plane",
            "Flight",
            "Schedule",
            "FlightInstance",
            "Customer",
            "Reservation",
            "Technician",
            "Pilot",
            "Repair",
            "MaintenanceRequest",
        ] {
            assert!(table_exists(&conn, table).unwrap(), "missing table {}", table);
        }
        assert!(!table_exists(&conn, "Airport").unwrap());
    }

    #[test]
    fn test_user_account_constraints() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO UserAccount (Username, Password, Role) VALUES ('amy', 'pw', 'Pilot')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO UserAccount (Username, Password, Role) VALUES ('amy', 'other', 'Customer')",
            [],
        );
        assert!(duplicate.is_err());

        let bad_role = conn.execute(
            "INSERT INTO UserAccount (Username, Password, Role) VALUES ('bo', 'pw', 'pilot')",
            [],
        );
        assert!(bad_role.is_err());
    }
}
