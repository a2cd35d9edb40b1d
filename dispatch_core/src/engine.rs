//! Simulation engine - nearest-agent assignment over the package list.
//!
//! Packages are consumed strictly in input order. For each one the engine:
//! 1. Injects the planned agent if this is the halfway package (`i == len / 2`)
//! 2. Picks the agent nearest to the package's warehouse
//! 3. Charges that agent `d(agent, warehouse) + d(warehouse, destination) + delay`
//! 4. Records a route trace
//!
//! Agent positions never change during a run; only the roster grows.

use crate::error::DispatchError;
use crate::model::{AgentId, Coord, DispatchInput};
use crate::report::BEST_AGENT_KEY;
use dispatch_env::DelaySource;
use tracing::{debug, info};

/// Default id of the agent that joins halfway through the run.
pub const DEFAULT_INJECTED_AGENT: &str = "A4";

/// The agent that joins the roster halfway through the run.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionPlan {
    /// Id of the joining agent
    pub agent_id: AgentId,

    /// Where the joining agent is stationed
    pub position: Coord,
}

impl InjectionPlan {
    pub fn new(agent_id: impl Into<AgentId>, position: Coord) -> Self {
        Self {
            agent_id: agent_id.into(),
            position,
        }
    }
}

impl Default for InjectionPlan {
    fn default() -> Self {
        Self::new(DEFAULT_INJECTED_AGENT, Coord::from_ints(20, 80))
    }
}

/// Record of an injection that actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Injection {
    /// Package index at which the agent joined
    pub index: usize,

    pub agent_id: AgentId,

    pub position: Coord,
}

/// Per-agent accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStats {
    /// Packages assigned to this agent
    pub packages_delivered: u64,

    /// Sum of travel plus delay over all assigned packages
    pub total_distance: f64,

    /// One trace per delivery, in delivery order
    pub routes: Vec<String>,
}

/// Per-agent statistics in roster order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryStats {
    entries: Vec<(AgentId, AgentStats)>,
}

impl DeliveryStats {
    fn push(&mut self, id: AgentId) {
        self.entries.push((id, AgentStats::default()));
    }

    pub fn get(&self, id: &str) -> Option<&AgentStats> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentStats)> {
        self.entries.iter().map(|(id, stats)| (id.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total packages delivered across all agents.
    pub fn total_delivered(&self) -> u64 {
        self.entries.iter().map(|(_, s)| s.packages_delivered).sum()
    }
}

/// Output of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Statistics in roster order (injected agent last)
    pub stats: DeliveryStats,

    /// The mid-run join, if the package list was non-empty
    pub injection: Option<Injection>,
}

/// Renders one delivery as `agent ---> warehouse ---> destination`.
pub fn route_trace(start: &Coord, mid: &Coord, end: &Coord) -> String {
    format!("{} ---> {} ---> {}", start, mid, end)
}

/// Runs the dispatch simulation over `input`.
///
/// The input is not modified; the engine works on its own copy of the roster.
///
/// # Errors
/// - [`DispatchError::UnknownWarehouse`] if a package names a missing warehouse
/// - [`DispatchError::EmptyRoster`] if no agent exists when a package needs one
/// - [`DispatchError::DuplicateAgent`] if the planned agent is already rostered
/// - [`DispatchError::ReservedAgentId`] if an agent is named like the report's
///   best-agent field
pub fn simulate<D>(
    input: &DispatchInput,
    plan: &InjectionPlan,
    delay: &mut D,
) -> Result<SimulationOutcome, DispatchError>
where
    D: DelaySource + ?Sized,
{
    let mut roster = input.agents.clone();
    let mut stats = DeliveryStats::default();
    for (id, _) in roster.iter() {
        if id == BEST_AGENT_KEY {
            return Err(DispatchError::ReservedAgentId(id.to_string()));
        }
        stats.push(id.to_string());
    }

    let midpoint = input.packages.len() / 2;
    let mut injection = None;

    for (i, pkg) in input.packages.iter().enumerate() {
        if i == midpoint {
            if plan.agent_id == BEST_AGENT_KEY {
                return Err(DispatchError::ReservedAgentId(plan.agent_id.clone()));
            }
            if !roster.add(plan.agent_id.clone(), plan.position) {
                return Err(DispatchError::DuplicateAgent(plan.agent_id.clone()));
            }
            stats.push(plan.agent_id.clone());
            info!(
                "Agent {} joined at package {} from {}",
                plan.agent_id, i, plan.position
            );
            injection = Some(Injection {
                index: i,
                agent_id: plan.agent_id.clone(),
                position: plan.position,
            });
        }

        let warehouse = input
            .warehouse(&pkg.warehouse)
            .ok_or_else(|| DispatchError::unknown_warehouse(i, &pkg.warehouse))?;

        let (idx, to_warehouse) = roster
            .nearest(warehouse)
            .ok_or(DispatchError::EmptyRoster(i))?;
        let (agent_id, agent_pos) = roster.at(idx).ok_or(DispatchError::EmptyRoster(i))?;

        let to_destination = warehouse.distance(&pkg.destination);
        let total = to_warehouse + to_destination + delay.next_delay();

        // Roster and stats grow together, so indices line up
        let (_, agent_stats) = &mut stats.entries[idx];
        agent_stats.packages_delivered += 1;
        agent_stats.total_distance += total;
        agent_stats
            .routes
            .push(route_trace(agent_pos, warehouse, &pkg.destination));

        debug!(
            "Package {} ({}) -> {} | distance {:.2}",
            i, pkg.warehouse, agent_id, total
        );
    }

    Ok(SimulationOutcome { stats, injection })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Package, Roster};
    use approx::assert_relative_eq;
    use dispatch_env::FixedDelay;
    use std::collections::HashMap;

    fn input(agents: Vec<(&str, Coord)>, packages: Vec<Package>) -> DispatchInput {
        let mut warehouses = HashMap::new();
        warehouses.insert("W1".to_string(), Coord::from_ints(0, 0));
        warehouses.insert("W2".to_string(), Coord::from_ints(100, 0));
        DispatchInput {
            warehouses,
            agents: agents.into_iter().collect::<Roster>(),
            packages,
        }
    }

    fn pkg(warehouse: &str, x: i64, y: i64) -> Package {
        Package::new(warehouse, Coord::from_ints(x, y))
    }

    #[test]
    fn test_assigns_nearest_agent() {
        let input = input(
            vec![
                ("A1", Coord::from_ints(3, 4)),
                ("A2", Coord::from_ints(90, 0)),
            ],
            vec![pkg("W2", 100, 10), pkg("W1", 0, 0)],
        );

        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();

        // Package 0 before injection; package 1 after A4 joins at [20, 80]
        let a1 = outcome.stats.get("A1").unwrap();
        let a2 = outcome.stats.get("A2").unwrap();
        assert_eq!(a1.packages_delivered, 1);
        assert_eq!(a2.packages_delivered, 1);
        assert_relative_eq!(a2.total_distance, 10.0 + 10.0);
        assert_relative_eq!(a1.total_distance, 5.0);
        assert_eq!(outcome.stats.get("A4").unwrap().packages_delivered, 0);
    }

    #[test]
    fn test_delay_is_added_per_delivery() {
        let input = input(
            vec![("A1", Coord::from_ints(0, 0))],
            vec![pkg("W1", 3, 4), pkg("W1", 0, 0), pkg("W1", 0, 0)],
        );

        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::new(2.5)).unwrap();

        let a1 = outcome.stats.get("A1").unwrap();
        assert_eq!(a1.packages_delivered, 3);
        assert_relative_eq!(a1.total_distance, 5.0 + 3.0 * 2.5);
    }

    #[test]
    fn test_tie_goes_to_earlier_agent() {
        let input = input(
            vec![
                ("B", Coord::from_ints(0, 5)),
                ("A", Coord::from_ints(5, 0)),
            ],
            vec![pkg("W1", 1, 1)],
        );

        // Single package: A4 joins first but is farther away
        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();
        assert_eq!(outcome.stats.get("B").unwrap().packages_delivered, 1);
        assert_eq!(outcome.stats.get("A").unwrap().packages_delivered, 0);
    }

    #[test]
    fn test_injection_happens_at_midpoint() {
        let plan = InjectionPlan::new("NEW", Coord::from_ints(0, 0));
        let input = input(
            vec![("A1", Coord::from_ints(50, 0))],
            (0..5).map(|_| pkg("W1", 0, 0)).collect(),
        );

        let outcome = simulate(&input, &plan, &mut FixedDelay::zero()).unwrap();

        let injection = outcome.injection.unwrap();
        assert_eq!(injection.index, 2);
        assert_eq!(injection.agent_id, "NEW");

        // NEW sits on W1, so it takes every package from index 2 on
        assert_eq!(outcome.stats.get("A1").unwrap().packages_delivered, 2);
        assert_eq!(outcome.stats.get("NEW").unwrap().packages_delivered, 3);

        let ids: Vec<&str> = outcome.stats.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["A1", "NEW"]);
    }

    #[test]
    fn test_single_package_injects_before_assignment() {
        let plan = InjectionPlan::new("NEW", Coord::from_ints(0, 1));
        let input = input(vec![("A1", Coord::from_ints(50, 50))], vec![pkg("W1", 0, 0)]);

        let outcome = simulate(&input, &plan, &mut FixedDelay::zero()).unwrap();

        assert_eq!(outcome.injection.as_ref().map(|i| i.index), Some(0));
        assert_eq!(outcome.stats.get("NEW").unwrap().packages_delivered, 1);
        assert_eq!(outcome.stats.get("A1").unwrap().packages_delivered, 0);
    }

    #[test]
    fn test_empty_packages_skip_injection() {
        let input = input(vec![("A1", Coord::from_ints(0, 0))], vec![]);

        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();

        assert!(outcome.injection.is_none());
        assert!(!outcome.stats.is_empty());
        assert_eq!(outcome.stats.len(), 1);
        assert_eq!(outcome.stats.total_delivered(), 0);
    }

    #[test]
    fn test_single_package_empty_roster_uses_injected_agent() {
        let input = input(vec![], vec![pkg("W1", 0, 0)]);

        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();
        assert_eq!(outcome.stats.get("A4").unwrap().packages_delivered, 1);
    }

    #[test]
    fn test_empty_roster_is_fatal() {
        let input = input(vec![], vec![pkg("W1", 0, 0), pkg("W1", 0, 0)]);

        let err = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap_err();
        assert!(matches!(err, DispatchError::EmptyRoster(0)));
    }

    #[test]
    fn test_unknown_warehouse_is_fatal() {
        let input = input(
            vec![("A1", Coord::from_ints(0, 0))],
            vec![pkg("W1", 0, 0), pkg("W9", 0, 0)],
        );

        let err = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap_err();
        match err {
            DispatchError::UnknownWarehouse { index, warehouse } => {
                assert_eq!(index, 1);
                assert_eq!(warehouse, "W9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_injection_rejected() {
        let input = input(vec![("A4", Coord::from_ints(0, 0))], vec![pkg("W1", 0, 0)]);

        let err = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap_err();
        assert!(matches!(err, DispatchError::DuplicateAgent(id) if id == "A4"));
    }

    #[test]
    fn test_reserved_agent_id_rejected() {
        let input = input(vec![("best_agent", Coord::from_ints(0, 0))], vec![]);

        let err = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap_err();
        assert!(matches!(err, DispatchError::ReservedAgentId(_)));
    }

    #[test]
    fn test_route_traces_in_delivery_order() {
        let input = input(
            vec![("A1", Coord::from_ints(1, 1))],
            vec![pkg("W1", 5, 5), pkg("W1", 6, 6), pkg("W1", 7, 7), pkg("W1", 8, 8)],
        );
        let plan = InjectionPlan::new("FAR", Coord::from_ints(1000, 1000));

        let outcome = simulate(&input, &plan, &mut FixedDelay::zero()).unwrap();

        let routes = &outcome.stats.get("A1").unwrap().routes;
        assert_eq!(
            routes,
            &vec![
                "[1, 1] ---> [0, 0] ---> [5, 5]".to_string(),
                "[1, 1] ---> [0, 0] ---> [6, 6]".to_string(),
                "[1, 1] ---> [0, 0] ---> [7, 7]".to_string(),
                "[1, 1] ---> [0, 0] ---> [8, 8]".to_string(),
            ]
        );
    }
}
