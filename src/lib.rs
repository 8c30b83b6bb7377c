//! Reorder Tree
//!
//! Sorts the direct children of a product assembly by source, group, filter
//! tag and part number, realizes that order through the reorder graph tree
//! dialog (which can only move the selected row up), renumbers instances and
//! maintains group separator nodes.

pub mod cli;
pub mod core;
pub mod logging;
pub mod yaml;
