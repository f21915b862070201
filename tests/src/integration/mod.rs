//! Integration flows across the diagnostics crates.

pub mod watch_target;

mod capture_flows;
