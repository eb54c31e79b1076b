/// # Test Utilities Module
///
/// Shared fixtures for unit tests: an isolated in-memory airline database,
/// optionally seeded with a small realistic data set, and helpers for
/// driving a `Console` from a script.

use crate::console::Console;
use crate::core::db::{schema, StatementExecutor};
use crate::core::Result;
use rusqlite::Connection;
use std::io::Cursor;

/// Sample rows used across the unit tests.
pub const SAMPLE_DATA: &str = "
    INSERT INTO Plane (PlaneID, Make, Model, Year) VALUES
        ('P-1', 'Boeing', '737', 2010),
        ('P-2', 'Airbus', 'A320', 2015);

    INSERT INTO Flight (FlightNumber, PlaneID, DepartureCity, ArrivalCity) VALUES
        ('AA100', 'P-1', 'Riverside', 'Dallas'),
        ('AA200', 'P-2', 'Dallas', 'Chicago');

    INSERT INTO Schedule (FlightNumber, DayOfWeek, DepartureTime, ArrivalTime) VALUES
        ('AA100', 'Friday', '08:00', '11:00'),
        ('AA100', 'Monday', '08:00', '11:00'),
        ('AA200', 'Tuesday', '12:30', '15:00'),
        ('AA100', 'Wednesday', '09:00', '12:00');

    INSERT INTO FlightInstance
        (FlightInstanceID, FlightNumber, FlightDate, DepartureTime, DepartedOnTime, ArrivedOnTime,
         SeatsTotal, SeatsSold, NumOfStops, TicketCost) VALUES
        (1, 'AA100', '2024-05-01', '08:00', 1, 1, 150, 130, 0, 199.0),
        (2, 'AA100', '2024-05-02', '08:15', 0, 0, 150, 80, 0, 179.0),
        (3, 'AA200', '2024-05-01', '12:30', 1, 0, 180, 100, 1, 249.0);

    INSERT INTO Customer (CustomerID, FirstName, LastName, Gender, DOB, Address, Phone, Zip) VALUES
        (1, 'Ada', 'Lovelace', 'F', '1990-12-10', '1 Analytical Way', '555-0101', '92501'),
        (2, 'Alan', 'Turing', 'M', '1985-06-23', '2 Enigma Rd', '555-0102', '92502'),
        (3, 'Grace', 'Hopper', 'F', '1979-12-09', '3 Compiler Ct', '555-0103', '92503');

    INSERT INTO Reservation (ReservationID, CustomerID, FlightInstanceID, Status) VALUES
        ('R-1', 1, 1, 'flown'),
        ('R-2', 2, 1, 'reserved'),
        ('R-3', 3, 1, 'waitlist'),
        ('R-4', 1, 3, 'reserved');

    INSERT INTO Technician (TechnicianID, Name) VALUES ('T-1', 'Sam Rivera'), ('T-2', 'Kim Park');
    INSERT INTO Pilot (PilotID, Name, Airline) VALUES ('PL-1', 'Lee Chen', 'Inland Air');

    INSERT INTO Repair (PlaneID, RepairCode, RepairDate, TechnicianID) VALUES
        ('P-1', 'ENG-1', '2024-01-15', 'T-1'),
        ('P-1', 'HYD-3', '2024-03-02', 'T-2'),
        ('P-1', 'AVN-2', '2024-07-20', 'T-1'),
        ('P-2', 'ENG-4', '2023-11-30', 'T-2');
";

/// Isolated in-memory airline database
pub struct DatabaseFixture {
    connection: Connection,
}

impl DatabaseFixture {
    /// Empty airline schema with foreign keys enforced
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::ensure_schema(&connection)?;
        Ok(DatabaseFixture { connection })
    }

    /// Airline schema loaded with `SAMPLE_DATA`
    pub fn with_sample_data() -> Result<Self> {
        let fixture = Self::new()?;
        fixture.connection.execute_batch(SAMPLE_DATA)?;
        Ok(fixture)
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn executor(&self) -> StatementExecutor<'_> {
        StatementExecutor::new(&self.connection)
    }
}

/// Console that reads `input` and records everything written.
pub fn scripted(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

/// Everything a scripted console printed.
pub fn written(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.into_inner().1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_data_loads() {
        let fixture = DatabaseFixture::with_sample_data().unwrap();
        let executor = fixture.executor();
        assert_eq!(executor.execute_query_count("SELECT * FROM Reservation", []).unwrap(), 4);
        assert_eq!(executor.execute_query_count("SELECT * FROM UserAccount", []).unwrap(), 0);
    }

    #[test]
    fn test_foreign_keys_are_enforced() {
        let fixture = DatabaseFixture::new().unwrap();
        let result = fixture
            .connection()
            .execute("INSERT INTO Flight VALUES ('ZZ1', 'NO-PLANE', 'A', 'B')", []);
        assert!(result.is_err());
    }
}
