//! In-memory host used by the CLI and the tests
//!
//! The simulated dialog lists the processable children of a [`Product`]
//! rendered through the node template, reorders rows exactly like the real
//! list box (one step per command), and writes the row order back to the
//! product when applied.

use crate::core::config::DialogConfig;
use crate::core::dialog::{settle_delay, Host, ReorderDialog};
use crate::core::error::{ReorderError, Result};
use crate::core::executor::ListWidget;
use crate::core::node::Node;
use crate::core::product::Product;

/// Title of the simulated reorder window
pub const REORDER_WINDOW_TITLE: &str = "Graph tree reordering";

/// Render a list box row: `#PN#`, `#IN#` and `#SO#` are replaced by part
/// number, instance name and source
pub fn render_row(template: &str, node: &Node) -> String {
    template
        .replace("#PN#", &node.part_number)
        .replace("#IN#", &node.instance_name)
        .replace("#SO#", &node.source.to_string())
}

/// Host whose product lives in memory
#[derive(Debug, Clone)]
pub struct SimulatedHost {
    window_title: String,
    node_template: String,
}

impl SimulatedHost {
    pub fn new(node_template: impl Into<String>) -> Self {
        Self {
            window_title: REORDER_WINDOW_TITLE.to_string(),
            node_template: node_template.into(),
        }
    }
}

impl Host for SimulatedHost {
    fn connect_reorder_dialog<'a>(
        &'a mut self,
        product: &'a mut Product,
        config: &DialogConfig,
    ) -> Result<Box<dyn ReorderDialog + 'a>> {
        tracing::info!(window = %config.window_name, "Connecting to 'reorder graph tree' window...");
        std::thread::sleep(settle_delay(config));

        if !self.window_title.contains(&config.window_name) {
            return Err(ReorderError::WindowNotConnected {
                window: config.window_name.clone(),
                reason: format!("no open window matches (found {:?})", self.window_title),
            });
        }

        let dialog = SimulatedDialog::open(product, &self.node_template);
        tracing::info!(window = %config.window_name, rows = dialog.rows.len(), "Connected to window");
        Ok(Box::new(dialog))
    }

    fn exclude_from_bom(&mut self, product: &mut Product, instance_names: &[String]) -> Result<()> {
        for name in instance_names {
            let index = product
                .position(name)
                .ok_or_else(|| ReorderError::NodeNotFound { name: name.clone() })?;
            product.nodes[index].in_bom = false;
        }
        tracing::info!(count = instance_names.len(), "Excluded selected products from BOM");
        Ok(())
    }
}

/// The reorder dialog over an in-memory product
pub struct SimulatedDialog<'a> {
    product: &'a mut Product,
    rows: Vec<String>,
    /// Instance name behind each row, kept parallel to `rows`
    names: Vec<String>,
    /// Order when the dialog was opened, restored by abort
    opened_with: Vec<String>,
    selected: Option<usize>,
    closed: bool,
}

impl<'a> SimulatedDialog<'a> {
    pub fn open(product: &'a mut Product, template: &str) -> Self {
        let (rows, names): (Vec<String>, Vec<String>) = product
            .processable()
            .into_iter()
            .map(|n| (render_row(template, n), n.instance_name.clone()))
            .unzip();

        Self {
            product,
            rows,
            opened_with: names.clone(),
            names,
            selected: None,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(ReorderError::WindowNotConnected {
                window: REORDER_WINDOW_TITLE.to_string(),
                reason: "the dialog has been closed".to_string(),
            });
        }
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.rows.swap(a, b);
        self.names.swap(a, b);
    }
}

impl ListWidget for SimulatedDialog<'_> {
    fn item_texts(&self) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self.rows.clone())
    }

    fn select(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;
        let index = self
            .rows
            .iter()
            .position(|r| r == text)
            .ok_or_else(|| ReorderError::UnknownItem { text: text.to_string() })?;
        self.selected = Some(index);
        Ok(())
    }

    fn move_up(&mut self) -> Result<()> {
        self.ensure_open()?;
        if let Some(index) = self.selected.filter(|i| *i > 0) {
            self.swap(index, index - 1);
            self.selected = Some(index - 1);
        }
        Ok(())
    }
}

impl ReorderDialog for SimulatedDialog<'_> {
    fn move_down(&mut self) -> Result<()> {
        self.ensure_open()?;
        if let Some(index) = self.selected.filter(|i| i + 1 < self.rows.len()) {
            self.swap(index, index + 1);
            self.selected = Some(index + 1);
        }
        Ok(())
    }

    fn press_apply(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.product.reorder(&self.names)
    }

    fn press_ok(&mut self) -> Result<()> {
        self.press_apply()?;
        self.closed = true;
        Ok(())
    }

    fn press_abort(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.product.reorder(&self.opened_with)?;
        self.closed = true;
        Ok(())
    }
}
