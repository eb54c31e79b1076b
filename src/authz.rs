//! Role to operation bindings.
//!
//! The dispatcher consults this table before running anything and renders
//! the role menus from it.

use crate::auth::Role;
use crate::core::{ConsoleError, Result};
use crate::operations::Operation;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationTable {
    bindings: BTreeMap<Role, BTreeMap<u32, Operation>>,
}

impl AuthorizationTable {
    /// Empty table; every choice is unrecognized.
    pub fn new() -> Self {
        AuthorizationTable {
            bindings: BTreeMap::new(),
        }
    }

    /// The airline's standard menu layout.
    pub fn standard() -> Self {
        let mut table = AuthorizationTable::new();
        let management = [
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
        ];
        for (choice, operation) in (1..).zip(management) {
            table.bind(Role::Management, choice, operation);
        }
        table.bind(Role::Customer, 10, Operation::SearchFlights);
        table.bind(Role::Pilot, 15, Operation::RequestMaintenance);
        table.bind(Role::Technician, 16, Operation::ViewMaintenanceRequests);
        table.bind(Role::Technician, 17, Operation::LogRepair);
        table
    }

    /// Binds `choice` to `operation` for `role`, replacing any earlier binding.
    pub fn bind(&mut self, role: Role, choice: u32, operation: Operation) {
        self.bindings.entry(role).or_default().insert(choice, operation);
    }

    /// Operations available to `role`, ordered by choice number.
    pub fn permitted(&self, role: Role) -> impl Iterator<Item = (u32, Operation)> + '_ {
        self.bindings
            .get(&role)
            .into_iter()
            .flat_map(|choices| choices.iter().map(|(choice, op)| (*choice, *op)))
    }

    /// Resolves a menu choice for `role`.
    ///
    /// Returns `Ok(None)` when no role has the choice, and
    /// `ConsoleError::Authorization` when it belongs to a different role.
    pub fn check(&self, role: Role, choice: u32) -> Result<Option<Operation>> {
        if let Some(operation) = self.bindings.get(&role).and_then(|choices| choices.get(&choice)) {
            return Ok(Some(*operation));
        }
        let bound_elsewhere = self.bindings.values().any(|choices| choices.contains_key(&choice));
        if bound_elsewhere {
            Err(ConsoleError::Authorization { role, choice })
        } else {
            Ok(None)
        }
    }
}

impl Default for AuthorizationTable {
    fn default() -> Self {
        AuthorizationTable::standard()
    }
}
