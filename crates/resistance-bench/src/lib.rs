#![deny(warnings)]

//! Experiment harness for The Resistance: plays many seeded games between
//! configured agent rosters and reports how reliably each strategy identifies
//! the spies.

pub mod config;
pub mod experiment;
pub mod logging;
