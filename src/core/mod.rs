//! Core module - sorting, matching and reordering product tree nodes

pub mod appdata;
pub mod config;
pub mod dialog;
pub mod error;
pub mod executor;
pub mod filter;
pub mod groups;
pub mod matcher;
pub mod node;
pub mod permissions;
pub mod product;
pub mod renumber;
pub mod simulated;
pub mod task;

pub use appdata::AppData;
pub use config::{Config, FilterKind};
pub use dialog::{DialogSession, Host, ReorderDialog};
pub use error::{ReorderError, Result};
pub use executor::{apply, plan_moves, ApplyStats, ListWidget, PlannedMove};
pub use filter::{Filter, SortKey};
pub use groups::GroupSynthesis;
pub use matcher::{Alignment, Matcher};
pub use node::{Node, NodeKind, PropertyBag, Source};
pub use product::Product;
pub use renumber::{renumber, RenumberReport};
pub use simulated::{SimulatedDialog, SimulatedHost};
pub use task::{Task, TaskReport};
