//! The host application boundary
//!
//! The reorder graph tree dialog is modal and non-transactional: every
//! command takes effect immediately and only "abort" rolls the whole dialog
//! back to the state it was opened in. [`DialogSession`] makes sure that
//! abort happens whenever a session ends without being committed.

use std::time::Duration;

use crate::core::config::DialogConfig;
use crate::core::error::Result;
use crate::core::executor::ListWidget;
use crate::core::product::Product;

/// The reorder graph tree dialog: a list box plus its buttons
pub trait ReorderDialog: ListWidget {
    /// Move the selected row one step towards the bottom
    fn move_down(&mut self) -> Result<()>;

    /// Apply the current order without closing
    fn press_apply(&mut self) -> Result<()>;

    /// Apply and close
    fn press_ok(&mut self) -> Result<()>;

    /// Discard everything since the dialog was opened and close
    fn press_abort(&mut self) -> Result<()>;
}

/// The CAD application hosting the product
pub trait Host {
    /// Open the reorder dialog for `product` and connect to its controls,
    /// giving the window `config.settle_ms` to appear
    fn connect_reorder_dialog<'a>(
        &'a mut self,
        product: &'a mut Product,
        config: &DialogConfig,
    ) -> Result<Box<dyn ReorderDialog + 'a>>;

    /// Uncheck "visualize in bill of material" for the given children
    fn exclude_from_bom(&mut self, product: &mut Product, instance_names: &[String]) -> Result<()>;
}

/// Settle delay before a freshly opened window is queried
pub fn settle_delay(config: &DialogConfig) -> Duration {
    Duration::from_millis(config.settle_ms)
}

/// An open dialog that is aborted on drop unless committed
pub struct DialogSession<'a> {
    dialog: Box<dyn ReorderDialog + 'a>,
    committed: bool,
}

impl<'a> DialogSession<'a> {
    pub fn new(dialog: Box<dyn ReorderDialog + 'a>) -> Self {
        Self {
            dialog,
            committed: false,
        }
    }

    pub fn dialog(&self) -> &(dyn ReorderDialog + 'a) {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> &mut (dyn ReorderDialog + 'a) {
        self.dialog.as_mut()
    }

    /// Press apply, then OK. On failure the session still aborts on drop.
    pub fn commit(mut self) -> Result<()> {
        self.dialog.press_apply()?;
        self.dialog.press_ok()?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for DialogSession<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        tracing::warn!("Aborting reorder dialog, all moves are discarded");
        if let Err(e) = self.dialog.press_abort() {
            tracing::error!(error = %e, "Failed to abort reorder dialog");
        }
    }
}
