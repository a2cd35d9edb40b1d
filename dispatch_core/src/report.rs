//! Report builder - efficiency metrics and best-agent selection.

use crate::engine::DeliveryStats;
use crate::model::AgentId;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Report field naming the winning agent.
pub const BEST_AGENT_KEY: &str = "best_agent";

/// Rounds to two decimal places.
///
/// Formatting rounds the exact binary value, ties to even, so `0.125`
/// becomes `0.12` and `0.375` becomes `0.38`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Derived metrics for one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub packages_delivered: u64,

    /// Rounded to 2 decimals
    pub total_distance: f64,

    /// Distance per delivered package, rounded to 2 decimals; 0 without deliveries
    pub efficiency: f64,
}

impl AgentMetrics {
    /// Rounds the raw totals and derives efficiency.
    pub fn from_totals(packages_delivered: u64, total_distance: f64) -> Self {
        let total_distance = round2(total_distance);
        let efficiency = if packages_delivered > 0 {
            round2(total_distance / packages_delivered as f64)
        } else {
            0.0
        };

        Self {
            packages_delivered,
            total_distance,
            efficiency,
        }
    }
}

/// Final run report.
///
/// Serializes as one JSON object: each agent id maps to its metrics, in
/// roster order, followed by `best_agent`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    agents: Vec<(AgentId, AgentMetrics)>,
    best_agent: Option<AgentId>,
}

impl Report {
    /// Builds the report from accumulated statistics.
    ///
    /// The best agent has the strictly lowest efficiency among agents that
    /// delivered something; the first one in stats order wins ties.
    pub fn from_stats(stats: &DeliveryStats) -> Self {
        let mut agents = Vec::with_capacity(stats.len());
        let mut best_agent = None;
        let mut best_efficiency = f64::INFINITY;

        for (id, s) in stats.iter() {
            let metrics = AgentMetrics::from_totals(s.packages_delivered, s.total_distance);

            if metrics.packages_delivered > 0 && metrics.efficiency < best_efficiency {
                best_efficiency = metrics.efficiency;
                best_agent = Some(id.to_string());
            }

            agents.push((id.to_string(), metrics));
        }

        Self { agents, best_agent }
    }

    pub fn best_agent(&self) -> Option<&str> {
        self.best_agent.as_deref()
    }

    /// Returns the best agent together with its metrics.
    pub fn best(&self) -> Option<(&str, &AgentMetrics)> {
        let id = self.best_agent.as_deref()?;
        self.get(id).map(|m| (id, m))
    }

    pub fn get(&self, id: &str) -> Option<&AgentMetrics> {
        self.agents
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, m)| m)
    }

    pub fn agents(&self) -> impl Iterator<Item = (&str, &AgentMetrics)> {
        self.agents.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Sum of `packages_delivered` over all agents.
    pub fn total_delivered(&self) -> u64 {
        self.agents.iter().map(|(_, m)| m.packages_delivered).sum()
    }
}

impl Serialize for Report {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.agents.len() + 1))?;
        for (id, metrics) in &self.agents {
            map.serialize_entry(id, metrics)?;
        }
        map.serialize_entry(BEST_AGENT_KEY, &self.best_agent)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = Report;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of agent metrics with a best_agent field")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Report, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut report = Report::default();
                let mut seen_best = false;

                while let Some(key) = map.next_key::<String>()? {
                    if key == BEST_AGENT_KEY {
                        report.best_agent = map.next_value()?;
                        seen_best = true;
                    } else {
                        let metrics: AgentMetrics = map.next_value()?;
                        report.agents.push((key, metrics));
                    }
                }

                if !seen_best {
                    return Err(serde::de::Error::missing_field(BEST_AGENT_KEY));
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}
