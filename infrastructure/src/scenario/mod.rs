//! Scripted club scenarios
//!
//! A scenario file describes a club, its members, the items they propose and
//! how each member will vote. It stands in for the external club and catalog
//! collaborators when running the engine from the command line.

mod file;

pub use file::{
    Scenario, ScenarioClub, ScenarioError, ScenarioFaults, ScenarioItem, ScenarioMember,
};
