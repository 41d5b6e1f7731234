//! Adif departures server.
//!
//! Looks up the next departures at Adif rail stations by driving the
//! station portal the way a browser would, and serves them to a front-end.

pub mod adif;
pub mod cli;
pub mod config;
pub mod registry;
pub mod schedule;
pub mod web;
