//! Bike-share availability dashboard server.
//!
//! Polls a GBFS feed on a fixed interval, joins station locations with
//! live availability, and serves the result as a map-and-table dashboard.

pub mod config;
pub mod gbfs;
pub mod present;
pub mod refresh;
pub mod station;
pub mod web;
