//! The airline query operations bound to menu choices.
//!
//! Every operation follows the same pattern: prompt for a few fields, bind
//! them into a fixed SQL template, run it through the statement executor, and
//! print the outcome. Reports print a table followed by a row total; records
//! insert a row and print its id.

use crate::console::Console;
use crate::core::db::StatementExecutor;
use crate::core::{ConsoleError, Result};
use chrono::NaiveDate;
use rusqlite::{params_from_iter, types::Value};
use std::io::{BufRead, Write};
use tracing::info;

pub const INVALID_DATE: &str = "Invalid date. Please use DD-MM-YY.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// DD-MM-YY, DD-MM-YYYY or YYYY-MM-DD; bound as ISO `YYYY-MM-DD`
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn text(label: &'static str) -> Field {
    Field {
        label,
        kind: FieldKind::Text,
    }
}

const fn date(label: &'static str) -> Field {
    Field {
        label,
        kind: FieldKind::Date,
    }
}

const FLIGHT_NUMBER: Field = text("\tEnter Flight Number: ");
const FLIGHT_DATE: Field = date("\tEnter Flight Date (DD-MM-YY): ");
const START_DATE: Field = date("\tEnter Start Date (DD-MM-YY): ");
const END_DATE: Field = date("\tEnter End Date (DD-MM-YY): ");
const RESERVATION_ID: Field = text("\tEnter Reservation ID: ");
const PLANE_ID: Field = text("\tEnter Plane ID: ");
const TECHNICIAN_ID: Field = text("\tEnter Technician ID: ");
const PILOT_ID: Field = text("\tEnter Pilot ID: ");
const DEPARTURE_CITY: Field = text("\tEnter Departure City: ");
const ARRIVAL_CITY: Field = text("\tEnter Arrival City: ");
const REPAIR_CODE: Field = text("\tEnter Repair Code: ");
const REQUEST_DATE: Field = date("\tEnter Request Date (DD-MM-YY): ");
const REPAIR_DATE: Field = date("\tEnter Repair Date (DD-MM-YY): ");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// SELECT printed as a table
    Report,
    /// INSERT of a single row
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    ViewFlightSchedule,
    ViewFlightSeats,
    ViewFlightStatus,
    ViewFlightsOfDay,
    ViewPassengerList,
    ViewTravelerInfo,
    ViewPlaneInfo,
    ViewTechnicianRepairs,
    ViewPlaneRepairs,
    ViewFlightStatistics,
    SearchFlights,
    RequestMaintenance,
    ViewMaintenanceRequests,
    LogRepair,
}

impl Operation {
    /// Menu text
    pub fn title(&self) -> &'static str {
        match self {
            Operation::ViewFlightSchedule => "View Flights",
            Operation::ViewFlightSeats => "View Flight Seats",
            Operation::ViewFlightStatus => "View Flight Status",
            Operation::ViewFlightsOfDay => "View Flights of the day",
            Operation::ViewPassengerList => "View Full Order ID History",
            Operation::ViewTravelerInfo => "View Traveler Information",
            Operation::ViewPlaneInfo => "View Plane Information",
            Operation::ViewTechnicianRepairs => "View Technician Repair History",
            Operation::ViewPlaneRepairs => "View Plane Repair History",
            Operation::ViewFlightStatistics => "View Flight Statistics",
            Operation::SearchFlights => "Search Flights",
            Operation::RequestMaintenance => "Maintenance Request",
            Operation::ViewMaintenanceRequests => "View Maintenance Requests",
            Operation::LogRepair => "Log Repair",
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::RequestMaintenance | Operation::LogRepair => OperationKind::Record,
            _ => OperationKind::Report,
        }
    }

    /// Prompts, in the order their values are bound to `?1`, `?2`, ...
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Operation::ViewFlightSchedule => &[FLIGHT_NUMBER],
            Operation::ViewFlightSeats | Operation::ViewFlightStatus | Operation::ViewPassengerList => {
                &[FLIGHT_NUMBER, FLIGHT_DATE]
            }
            Operation::ViewFlightsOfDay => &[FLIGHT_DATE],
            Operation::ViewTravelerInfo => &[RESERVATION_ID],
            Operation::ViewPlaneInfo | Operation::ViewMaintenanceRequests => &[PLANE_ID],
            Operation::ViewTechnicianRepairs => &[TECHNICIAN_ID],
            Operation::ViewPlaneRepairs => &[PLANE_ID, START_DATE, END_DATE],
            Operation::ViewFlightStatistics => &[FLIGHT_NUMBER, START_DATE, END_DATE],
            Operation::SearchFlights => &[DEPARTURE_CITY, ARRIVAL_CITY, FLIGHT_DATE],
            Operation::RequestMaintenance => &[PILOT_ID, PLANE_ID, REPAIR_CODE, REQUEST_DATE],
            Operation::LogRepair => &[TECHNICIAN_ID, PLANE_ID, REPAIR_CODE, REPAIR_DATE],
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Operation::ViewFlightSchedule => {
                "SELECT FlightNumber, DayOfWeek, DepartureTime, ArrivalTime \
                 FROM Schedule WHERE FlightNumber = ?1 \
                 ORDER BY CASE DayOfWeek \
                 WHEN 'Monday' THEN 1 WHEN 'Tuesday' THEN 2 WHEN 'Wednesday' THEN 3 \
                 WHEN 'Thursday' THEN 4 WHEN 'Friday' THEN 5 WHEN 'Saturday' THEN 6 \
                 WHEN 'Sunday' THEN 7 ELSE 8 END"
            }
            Operation::ViewFlightSeats => {
                "SELECT SeatsTotal - SeatsSold AS SeatsAvailable, SeatsSold \
                 FROM FlightInstance WHERE FlightNumber = ?1 AND FlightDate = ?2"
            }
            Operation::ViewFlightStatus => {
                "SELECT DepartedOnTime, ArrivedOnTime \
                 FROM FlightInstance WHERE FlightNumber = ?1 AND FlightDate = ?2"
            }
            Operation::ViewFlightsOfDay => {
                "SELECT fi.FlightNumber, f.DepartureCity, f.ArrivalCity, fi.DepartureTime, \
                 fi.DepartedOnTime, fi.ArrivedOnTime \
                 FROM FlightInstance fi JOIN Flight f ON fi.FlightNumber = f.FlightNumber \
                 WHERE fi.FlightDate = ?1 ORDER BY fi.DepartureTime"
            }
            Operation::ViewPassengerList => {
                "SELECT C.FirstName, C.LastName, R.Status \
                 FROM Reservation R \
                 JOIN Customer C ON R.CustomerID = C.CustomerID \
                 JOIN FlightInstance FI ON R.FlightInstanceID = FI.FlightInstanceID \
                 WHERE FI.FlightNumber = ?1 AND FI.FlightDate = ?2 \
                 ORDER BY CASE R.Status \
                 WHEN 'reserved' THEN 1 WHEN 'waitlist' THEN 2 WHEN 'flown' THEN 3 ELSE 4 END, \
                 C.LastName, C.FirstName"
            }
            Operation::ViewTravelerInfo => {
                "SELECT C.CustomerID, C.FirstName, C.LastName, C.Gender, C.DOB, C.Address, C.Phone, C.Zip \
                 FROM Reservation R JOIN Customer C ON R.CustomerID = C.CustomerID \
                 WHERE R.ReservationID = ?1"
            }
            Operation::ViewPlaneInfo => {
                "SELECT P.Make, P.Model, \
                 CAST(strftime('%Y', 'now') AS INTEGER) - P.Year AS Age, \
                 (SELECT MAX(Rp.RepairDate) FROM Repair Rp WHERE Rp.PlaneID = P.PlaneID) AS LastRepairDate \
                 FROM Plane P WHERE P.PlaneID = ?1"
            }
            Operation::ViewTechnicianRepairs => {
                "SELECT R.RepairID, R.PlaneID, R.RepairCode, R.RepairDate \
                 FROM Repair R WHERE R.TechnicianID = ?1 ORDER BY R.RepairDate DESC"
            }
            Operation::ViewPlaneRepairs => {
                "SELECT R.RepairID, R.RepairCode, R.RepairDate, R.TechnicianID \
                 FROM Repair R WHERE R.PlaneID = ?1 AND R.RepairDate BETWEEN ?2 AND ?3 \
                 ORDER BY R.RepairDate"
            }
            Operation::ViewFlightStatistics => {
                "SELECT \
                 COUNT(*) FILTER (WHERE FI.DepartedOnTime = 1) AS NumDepartedOnTime, \
                 COUNT(*) FILTER (WHERE FI.DepartedOnTime = 0) AS NumDepartedDelayed, \
                 COUNT(*) FILTER (WHERE FI.ArrivedOnTime = 1) AS NumArrivedOnTime, \
                 COUNT(*) FILTER (WHERE FI.ArrivedOnTime = 0) AS NumArrivedDelayed, \
                 COALESCE(SUM(FI.SeatsSold), 0) AS TotalSeatsSold, \
                 COALESCE(SUM(FI.SeatsTotal - FI.SeatsSold), 0) AS TotalSeatsUnsold \
                 FROM FlightInstance FI \
                 WHERE FI.FlightNumber = ?1 AND FI.FlightDate BETWEEN ?2 AND ?3"
            }
            Operation::SearchFlights => {
                "SELECT fi.FlightNumber, fi.FlightDate, fi.DepartureTime, fi.NumOfStops, fi.TicketCost, \
                 fi.SeatsTotal - fi.SeatsSold AS SeatsAvailable \
                 FROM FlightInstance fi JOIN Flight f ON fi.FlightNumber = f.FlightNumber \
                 WHERE f.DepartureCity = ?1 COLLATE NOCASE AND f.ArrivalCity = ?2 COLLATE NOCASE \
                 AND fi.FlightDate = ?3 \
                 ORDER BY fi.DepartureTime"
            }
            Operation::ViewMaintenanceRequests => {
                "SELECT M.RequestID, M.RepairCode, M.RequestDate, M.PilotID \
                 FROM MaintenanceRequest M WHERE M.PlaneID = ?1 ORDER BY M.RequestDate DESC"
            }
            Operation::RequestMaintenance => {
                "INSERT INTO MaintenanceRequest (PilotID, PlaneID, RepairCode, RequestDate) \
                 VALUES (?1, ?2, ?3, ?4)"
            }
            Operation::LogRepair => {
                "INSERT INTO Repair (TechnicianID, PlaneID, RepairCode, RepairDate) \
                 VALUES (?1, ?2, ?3, ?4)"
            }
        }
    }

    /// Prompts for every field, re-prompting on invalid dates.
    pub fn collect<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(self.fields().len());
        for field in self.fields() {
            let value = match field.kind {
                FieldKind::Text => Value::Text(console.prompt(field.label)?.trim().to_string()),
                FieldKind::Date => {
                    let day = console.prompt_until(field.label, parse_date)?;
                    Value::Text(day.format("%Y-%m-%d").to_string())
                }
            };
            values.push(value);
        }
        Ok(values)
    }

    /// Runs the operation with already collected values.
    ///
    /// Returns the number of rows printed for reports, or rows inserted for records.
    pub fn execute<W: Write>(&self, executor: &StatementExecutor, values: &[Value], out: &mut W) -> Result<usize> {
        match self.kind() {
            OperationKind::Report => {
                let count = executor.execute_query_print(self.sql(), params_from_iter(values.iter()), out)?;
                writeln!(out, "total row(s): {}", count)?;
                writeln!(out)?;
                Ok(count)
            }
            OperationKind::Record => {
                let count = executor.execute_update(self.sql(), params_from_iter(values.iter()))?;
                let id = executor.last_insert_id();
                info!(operation = ?self, id, "row recorded");
                writeln!(out, "{} saved with id {}.", self.title(), id)?;
                Ok(count)
            }
        }
    }

    /// Prompts for the fields and runs the operation.
    pub fn run<R: BufRead, W: Write>(&self, executor: &StatementExecutor, console: &mut Console<R, W>) -> Result<usize> {
        let values = self.collect(console)?;
        self.execute(executor, &values, console.output())
    }
}

/// Parses a date typed at a prompt.
///
/// The layout is picked from where the four-digit year sits, so a two-digit
/// year is never mistaken for a day.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    let invalid = || ConsoleError::Validation(INVALID_DATE.to_string());
    let parts: Vec<&str> = input.split('-').collect();
    let format = match parts.as_slice() {
        [year, _, _] if year.len() == 4 => "%Y-%m-%d",
        [_, _, year] if year.len() == 4 => "%d-%m-%Y",
        [_, _, year] if year.len() == 2 => "%d-%m-%y",
        _ => return Err(invalid()),
    };
    NaiveDate::parse_from_str(input, format).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{scripted, written, DatabaseFixture};

    fn run_report(operation: Operation, input: &str) -> (usize, String) {
        let fixture = DatabaseFixture::with_sample_data().unwrap();
        let executor = fixture.executor();
        let mut console = scripted(input);
        let count = operation.run(&executor, &mut console).unwrap();
        (count, written(console))
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("05-03-24").unwrap(), expected);
        assert_eq!(parse_date("05-03-2024").unwrap(), expected);
        assert_eq!(parse_date(" 2024-03-05 ").unwrap(), expected);
        assert!(matches!(parse_date("31-02-24"), Err(ConsoleError::Validation(_))));
        assert!(parse_date("tomorrow").is_err());
    }

    #[test]
    fn test_field_count_matches_placeholders() {
        let all = [
            Operation::ViewFlightSchedule,
            Operation::ViewFlightSeats,
            Operation::ViewFlightStatus,
            Operation::ViewFlightsOfDay,
            Operation::ViewPassengerList,
            Operation::ViewTravelerInfo,
            Operation::ViewPlaneInfo,
            Operation::ViewTechnicianRepairs,
            Operation::ViewPlaneRepairs,
            Operation::ViewFlightStatistics,
            Operation::SearchFlights,
            Operation::RequestMaintenance,
            Operation::ViewMaintenanceRequests,
            Operation::LogRepair,
        ];
        let fixture = DatabaseFixture::new().unwrap();
        let conn = fixture.connection();
        for operation in all {
            let stmt = conn.prepare(operation.sql()).unwrap();
            assert_eq!(
                stmt.parameter_count(),
                operation.fields().len(),
                "{:?} binds a different number of values than it prompts for",
                operation
            );
        }
    }

    #[test]
    fn test_schedule_is_ordered_by_weekday() {
        let (count, out) = run_report(Operation::ViewFlightSchedule, "AA100\n");
        assert_eq!(count, 3);
        let days: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("AA100\t"))
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(days, vec!["Monday", "Wednesday", "Friday"]);
        assert!(out.contains("total row(s): 3"));
    }

    #[test]
    fn test_seats_with_date_reprompt() {
        let (count, out) = run_report(Operation::ViewFlightSeats, "AA100\n2024/05/01\n01-05-24\n");
        assert_eq!(count, 1);
        assert!(out.contains(INVALID_DATE));
        assert!(out.contains("SeatsAvailable\tSeatsSold\t"));
        assert!(out.contains("\n20\t130\t\n"));
    }

    #[test]
    fn test_passenger_list_orders_by_status() {
        let (count, out) = run_report(Operation::ViewPassengerList, "AA100\n01-05-24\n");
        assert_eq!(count, 3);
        let statuses: Vec<&str> = out
            .lines()
            .skip_while(|l| !l.contains("FirstName\tLastName"))
            .skip(1)
            .take(count)
            .map(|l| l.split('\t').nth(2).unwrap())
            .collect();
        assert_eq!(statuses, vec!["reserved", "waitlist", "flown"]);
    }

    #[test]
    fn test_plane_repairs_in_range() {
        let (count, _) = run_report(Operation::ViewPlaneRepairs, "P-1\n01-01-24\n31-03-24\n");
        assert_eq!(count, 2);
        let (count, out) = run_report(Operation::ViewPlaneRepairs, "P-1\n01-06-24\n30-06-24\n");
        assert_eq!(count, 0);
        assert!(out.contains("total row(s): 0"));
        assert!(!out.contains("RepairID"));
    }

    #[test]
    fn test_flight_statistics() {
        let (count, out) = run_report(Operation::ViewFlightStatistics, "AA100\n01-05-24\n02-05-24\n");
        assert_eq!(count, 1);
        // two instances: one fully on time, one delayed on both legs
        assert!(out.contains("\n1\t1\t1\t1\t210\t90\t\n"), "unexpected output:\n{}", out);
    }

    #[test]
    fn test_search_flights_ignores_city_case() {
        let (count, out) = run_report(Operation::SearchFlights, "riverside\nDALLAS\n01-05-24\n");
        assert_eq!(count, 1);
        assert!(out.contains("AA100\t2024-05-01\t"));
    }

    #[test]
    fn test_log_repair_records_row() {
        let fixture = DatabaseFixture::with_sample_data().unwrap();
        let executor = fixture.executor();
        let mut console = scripted("T-1\nP-2\nENG-7\n10-06-24\n");
        let inserted = Operation::LogRepair.run(&executor, &mut console).unwrap();
        assert_eq!(inserted, 1);
        assert!(written(console).contains("Log Repair saved with id"));

        let rows = executor
            .execute_query_records(
                "SELECT RepairCode, RepairDate FROM Repair WHERE PlaneID = ?1 AND TechnicianID = ?2",
                ["P-2", "T-1"],
            )
            .unwrap();
        assert_eq!(rows, vec![vec!["ENG-7".to_string(), "2024-06-10".to_string()]]);
    }

    #[test]
    fn test_record_with_unknown_plane_is_sql_error() {
        let fixture = DatabaseFixture::with_sample_data().unwrap();
        let executor = fixture.executor();
        let mut console = scripted("PL-1\nNO-SUCH-PLANE\nHYD-2\n10-06-24\n");
        let result = Operation::RequestMaintenance.run(&executor, &mut console);
        assert!(matches!(result, Err(ConsoleError::Sql(_))));
    }
}
