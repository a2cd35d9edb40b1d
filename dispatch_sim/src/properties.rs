//! Property tests over random delivery plans.

use crate::context::SeededDelay;
use dispatch_core::export::write_report;
use dispatch_core::{simulate, Coord, DispatchInput, InjectionPlan, Package, Report, Roster};
use dispatch_env::FixedDelay;
use proptest::prelude::*;
use std::collections::HashMap;

fn coord() -> impl Strategy<Value = Coord> {
    (-50i64..50, -50i64..50).prop_map(|(x, y)| Coord::from_ints(x, y))
}

prop_compose! {
    fn dispatch_input()(
        agents in prop::collection::vec(coord(), 1..6),
        warehouses in prop::collection::vec(coord(), 1..4),
        packages in prop::collection::vec((0usize..4, coord()), 0..30),
    ) -> DispatchInput {
        let roster: Roster = agents
            .into_iter()
            .enumerate()
            .map(|(i, pos)| (format!("D{}", i), pos))
            .collect();
        let warehouse_count = warehouses.len();
        let warehouses: HashMap<String, Coord> = warehouses
            .into_iter()
            .enumerate()
            .map(|(i, pos)| (format!("W{}", i), pos))
            .collect();
        let packages = packages
            .into_iter()
            .map(|(w, dest)| Package::new(format!("W{}", w % warehouse_count), dest))
            .collect();

        DispatchInput { warehouses, agents: roster, packages }
    }
}

proptest! {
    #[test]
    fn prop_every_package_delivered_once(input in dispatch_input(), seed in any::<u64>()) {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut SeededDelay::new(seed)).unwrap();
        let report = Report::from_stats(&outcome.stats);

        prop_assert_eq!(outcome.stats.total_delivered(), input.packages.len() as u64);
        prop_assert_eq!(report.total_delivered(), input.packages.len() as u64);
        for (_, s) in outcome.stats.iter() {
            prop_assert_eq!(s.routes.len() as u64, s.packages_delivered);
        }
    }

    #[test]
    fn prop_idle_agents_never_best(input in dispatch_input(), seed in any::<u64>()) {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut SeededDelay::new(seed)).unwrap();
        let report = Report::from_stats(&outcome.stats);

        for (id, m) in report.agents() {
            if m.packages_delivered == 0 {
                prop_assert_eq!(m.efficiency, 0.0);
                prop_assert_ne!(report.best_agent(), Some(id));
            }
        }
        prop_assert_eq!(report.best_agent().is_none(), input.packages.is_empty());
    }

    #[test]
    fn prop_best_agent_is_first_minimum(input in dispatch_input(), seed in any::<u64>()) {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut SeededDelay::new(seed)).unwrap();
        let report = Report::from_stats(&outcome.stats);

        if let Some((best_id, best)) = report.best() {
            let active: Vec<(&str, f64)> = report
                .agents()
                .filter(|(_, m)| m.packages_delivered > 0)
                .map(|(id, m)| (id, m.efficiency))
                .collect();
            let min = active.iter().map(|(_, e)| *e).fold(f64::INFINITY, f64::min);
            let first = active.iter().find(|(_, e)| *e == min).map(|(id, _)| *id);

            prop_assert_eq!(best.efficiency, min);
            prop_assert_eq!(Some(best_id), first);
        }
    }

    #[test]
    fn prop_injection_at_midpoint(input in dispatch_input()) {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();
        let n = input.packages.len();

        match &outcome.injection {
            Some(injection) => {
                prop_assert!(n > 0);
                prop_assert_eq!(injection.index, n / 2);
                let joined = outcome.stats.get(&injection.agent_id).unwrap();
                prop_assert!(joined.packages_delivered as usize <= n - n / 2);

                let last = outcome.stats.iter().last().map(|(id, _)| id);
                prop_assert_eq!(last, Some(injection.agent_id.as_str()));
            }
            None => prop_assert_eq!(n, 0),
        }
    }

    #[test]
    fn prop_assignment_is_deterministic(input in dispatch_input()) {
        let a = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::new(1.5)).unwrap();
        let b = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::new(1.5)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_report_round_trip_keeps_count(input in dispatch_input(), seed in any::<u64>()) {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut SeededDelay::new(seed)).unwrap();
        let report = Report::from_stats(&outcome.stats);

        let mut buf = Vec::new();
        write_report(&report, &mut buf).unwrap();
        let parsed: Report = serde_json::from_slice(&buf).unwrap();

        prop_assert_eq!(parsed.total_delivered(), input.packages.len() as u64);
        prop_assert_eq!(parsed, report);
    }
}

#[test]
fn test_equidistant_agents_resolve_to_roster_order() {
    let json = r#"{
        "warehouses": { "W1": [0, 0] },
        "agents": { "East": [10, 0], "West": [-10, 0], "North": [0, 10] },
        "packages": [
            { "warehouse": "W1", "destination": [1, 1] },
            { "warehouse": "W1", "destination": [2, 2] },
            { "warehouse": "W1", "destination": [3, 3] }
        ]
    }"#;
    let input = DispatchInput::from_json_str(json).unwrap();

    for _ in 0..5 {
        let outcome = simulate(&input, &InjectionPlan::default(), &mut FixedDelay::zero()).unwrap();
        assert_eq!(outcome.stats.get("East").unwrap().packages_delivered, 3);
        assert_eq!(outcome.stats.get("West").unwrap().packages_delivered, 0);
        assert_eq!(outcome.stats.get("North").unwrap().packages_delivered, 0);
    }
}
