//! selfcast uploads recorded radio broadcasts to a podcast backend and
//! keeps episode descriptions in sync with the broadcaster's published
//! schedule.

pub mod backend;
pub mod cli;
pub mod config;
pub mod filename;
pub mod reconcile;
pub mod runner;
pub mod schedule;
pub mod scrape;
pub mod title;
pub mod watch;
