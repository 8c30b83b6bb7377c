//! Realizing an alignment in a list box that can only move rows up
//!
//! The dialog has no "set position" command, only "select row" and "move
//! the selected row one step up". Target positions are filled from the top:
//! for position `i` the aligned row is selected and moved up until it sits
//! at `i`. Rows placed earlier never move again, so this is a selection sort
//! built from adjacent swaps (O(n²) commands in the worst case).
//!
//! Every command is a live, irreversible interaction. If anything fails
//! half way the list is left partially reordered; the caller has to abort
//! the hosting dialog.

use serde::Serialize;

use crate::core::error::{ReorderError, Result};
use crate::core::matcher::Alignment;

/// A list control that supports selection and single step "move up"
pub trait ListWidget {
    /// Row texts in their current order
    fn item_texts(&self) -> Result<Vec<String>>;

    /// Select the row with the given text
    fn select(&mut self, text: &str) -> Result<()>;

    /// Move the selected row one step towards the top
    fn move_up(&mut self) -> Result<()>;

    /// Let the host process pending messages so the next command sees the
    /// effect of the previous one
    fn pump(&mut self) {}
}

/// Commands issued by [`apply`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    pub selects: usize,
    pub moves: usize,
}

/// One step of a reorder plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub target: usize,
    pub item: String,
    pub from: usize,
    pub moves_up: usize,
}

fn position_of(items: &[String], text: &str) -> Result<usize> {
    items
        .iter()
        .position(|t| t == text)
        .ok_or_else(|| ReorderError::UnknownItem { text: text.to_string() })
}

/// Drive `widget` until its rows follow `alignment`
pub fn apply<W: ListWidget + ?Sized>(alignment: &Alignment, widget: &mut W) -> Result<ApplyStats> {
    tracing::info!(items = alignment.len(), "Reordering tree items...");
    let mut stats = ApplyStats::default();

    for (target, item) in alignment.iter().enumerate() {
        widget.select(item)?;
        widget.pump();
        stats.selects += 1;

        let current = position_of(&widget.item_texts()?, item)?;
        // Only identical duplicate rows can already sit above their target
        let steps = current.saturating_sub(target);
        tracing::debug!(item, from = current, to = target, steps, "Moving item");

        for _ in 0..steps {
            widget.move_up()?;
            widget.pump();
            stats.moves += 1;
        }
    }

    tracing::info!(moves = stats.moves, "Successfully reordered graph tree items");
    Ok(stats)
}

/// Compute the commands [`apply`] would issue against a list currently
/// showing `current`, without touching any widget
pub fn plan_moves(alignment: &Alignment, current: &[String]) -> Result<Vec<PlannedMove>> {
    if alignment.len() != current.len() {
        return Err(ReorderError::ListSizeMismatch {
            expected: alignment.len(),
            found: current.len(),
        });
    }

    let mut rows = current.to_vec();
    let mut plan = Vec::with_capacity(rows.len());

    for (target, item) in alignment.iter().enumerate() {
        let from = position_of(&rows, item)?;
        let moves_up = from.saturating_sub(target);
        if moves_up > 0 {
            let row = rows.remove(from);
            rows.insert(target, row);
        }
        plan.push(PlannedMove {
            target,
            item: item.to_string(),
            from,
            moves_up,
        });
    }

    Ok(plan)
}
