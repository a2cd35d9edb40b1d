//! Input data model: coordinates, warehouses, the agent roster and packages.

use crate::error::DispatchError;
use nalgebra::Point2;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Number;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Identifier of an agent in the roster.
pub type AgentId = String;

/// One component of a coordinate, keeping the form it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Component {
    Int(i64),
    Float(f64),
}

impl Component {
    fn value(self) -> f64 {
        match self {
            Component::Int(v) => v as f64,
            Component::Float(v) => v,
        }
    }
}

impl TryFrom<&Number> for Component {
    type Error = String;

    fn try_from(n: &Number) -> Result<Self, Self::Error> {
        if let Some(v) = n.as_i64() {
            return Ok(Component::Int(v));
        }
        n.as_f64()
            .map(Component::Float)
            .ok_or_else(|| format!("coordinate component {} is not representable", n))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Int(v) => write!(f, "{}", v),
            // Debug keeps the trailing ".0" on whole floats
            Component::Float(v) => write!(f, "{:?}", v),
        }
    }
}

/// A 2D position.
///
/// Integer components stay integers for display, so a position read as
/// `[20, 80]` renders as `[20, 80]` and `[2.5, 3.0]` as `[2.5, 3.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "[Number; 2]")]
pub struct Coord {
    x: Component,
    y: Component,
}

impl Coord {
    /// Creates a coordinate from floating-point components.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Component::Float(x),
            y: Component::Float(y),
        }
    }

    /// Creates a coordinate from integer components.
    pub fn from_ints(x: i64, y: i64) -> Self {
        Self {
            x: Component::Int(x),
            y: Component::Int(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x.value()
    }

    pub fn y(&self) -> f64 {
        self.y.value()
    }

    /// Returns the position as a nalgebra point.
    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x(), self.y())
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Coord) -> f64 {
        nalgebra::distance(&self.point(), &other.point())
    }
}

impl TryFrom<[Number; 2]> for Coord {
    type Error = String;

    fn try_from([x, y]: [Number; 2]) -> Result<Self, Self::Error> {
        Ok(Self {
            x: Component::try_from(&x)?,
            y: Component::try_from(&y)?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// A delivery task: pick up at a warehouse, drop at a destination.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Package {
    /// Warehouse identifier
    pub warehouse: String,

    /// Drop-off position
    pub destination: Coord,
}

impl Package {
    pub fn new(warehouse: impl Into<String>, destination: Coord) -> Self {
        Self {
            warehouse: warehouse.into(),
            destination,
        }
    }
}

/// Ordered set of agents and their positions.
///
/// Iteration follows insertion order, which is the order agents appear in
/// the input document followed by any agent added during the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    agents: Vec<(AgentId, Coord)>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an agent. Returns `false` and leaves the roster untouched
    /// if the id is already present.
    pub fn add(&mut self, id: impl Into<AgentId>, position: Coord) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.agents.push((id, position));
        true
    }

    /// Inserts or repositions an agent, keeping its original slot.
    fn upsert(&mut self, id: AgentId, position: Coord) {
        match self.agents.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, pos)) => *pos = position,
            None => self.agents.push((id, position)),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.iter().any(|(existing, _)| existing == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coord)> {
        self.agents.iter().map(|(id, pos)| (id.as_str(), pos))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Finds the agent closest to `target`.
    ///
    /// Returns the roster index and the distance. On equal distances the
    /// agent earlier in the roster wins.
    pub fn nearest(&self, target: &Coord) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (_, pos)) in self.agents.iter().enumerate() {
            let d = pos.distance(target);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((idx, d)),
            }
        }
        best
    }

    /// Returns the agent at roster index `idx`.
    pub fn at(&self, idx: usize) -> Option<(&str, &Coord)> {
        self.agents.get(idx).map(|(id, pos)| (id.as_str(), pos))
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RosterVisitor;

        impl<'de> Visitor<'de> for RosterVisitor {
            type Value = Roster;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of agent id to [x, y]")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Roster, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut roster = Roster::new();
                while let Some((id, pos)) = map.next_entry::<AgentId, Coord>()? {
                    // A repeated id overwrites the position in its first slot
                    roster.upsert(id, pos);
                }
                Ok(roster)
            }
        }

        deserializer.deserialize_map(RosterVisitor)
    }
}

impl<S: Into<AgentId>> FromIterator<(S, Coord)> for Roster {
    fn from_iter<I: IntoIterator<Item = (S, Coord)>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for (id, pos) in iter {
            roster.upsert(id.into(), pos);
        }
        roster
    }
}

/// The complete input document.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchInput {
    /// Warehouse id -> position
    pub warehouses: HashMap<String, Coord>,

    /// Agents in document order
    pub agents: Roster,

    /// Packages in delivery order
    pub packages: Vec<Package>,
}

impl DispatchInput {
    /// Loads and parses the input document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DispatchError::read(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses an input document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DispatchError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parses an input document from a string.
    pub fn from_json_str(json: &str) -> Result<Self, DispatchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves a warehouse position by id.
    pub fn warehouse(&self, id: &str) -> Option<&Coord> {
        self.warehouses.get(id)
    }
}
