//! Bus information server.
//!
//! Serves live vehicle positions from the Bus Open Data Service, throttled
//! to one upstream call per interval, alongside timetable queries: what a
//! bus does next, departures from a stop, the nearest stop and the stops
//! on a route.

pub mod bods;
pub mod config;
pub mod domain;
pub mod live;
pub mod schedule;
pub mod web;
