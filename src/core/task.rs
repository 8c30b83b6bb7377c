//! The reorder workflow: groups, dialog, sort, renumber

use serde::Serialize;

use crate::core::config::Config;
use crate::core::dialog::{DialogSession, Host};
use crate::core::error::{ReorderError, Result};
use crate::core::executor::{self, ApplyStats};
use crate::core::filter::Filter;
use crate::core::groups::GroupSynthesis;
use crate::core::matcher::Matcher;
use crate::core::node::Node;
use crate::core::permissions::{current_logon, Permissions};
use crate::core::product::Product;
use crate::core::renumber::{self, RenumberReport};

/// Number of progress steps reported by [`Task::run`]
pub const STEPS: usize = 4;

/// What a run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskReport {
    /// Instance names of the created group placeholders
    pub groups: Vec<String>,
    pub sort: ApplyStats,
    pub renumber: Option<RenumberReport>,
}

type Progress<'a> = Option<Box<dyn FnMut(usize, &str) + 'a>>;

fn report(step: &mut usize, progress: &mut Progress<'_>, text: &str) {
    *step += 1;
    tracing::info!("Step {} of {}: {}", step, STEPS, text);
    if let Some(progress) = progress.as_mut() {
        progress(*step, text);
    }
}

/// Match the dialog rows and move them into canonical order. Any error
/// leaves the dialog partially reordered.
fn reorder_in_dialog(session: &mut DialogSession<'_>, matcher: &Matcher, canonical: &[Node]) -> Result<ApplyStats> {
    let items = session.dialog().item_texts()?;
    let alignment = matcher.align(canonical, &items)?;
    executor::apply(&alignment, session.dialog_mut())
}

/// One run of the workflow against a host
pub struct Task<'a, H: Host> {
    config: &'a Config,
    host: &'a mut H,
    logon: String,
    step: usize,
    progress: Progress<'a>,
}

impl<'a, H: Host> Task<'a, H> {
    pub fn new(config: &'a Config, host: &'a mut H) -> Self {
        Self {
            config,
            host,
            logon: current_logon(),
            step: 0,
            progress: None,
        }
    }

    pub fn with_logon(mut self, logon: impl Into<String>) -> Self {
        self.logon = logon.into();
        self
    }

    /// Called with the step number and a description at every step
    pub fn on_progress(mut self, progress: impl FnMut(usize, &str) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    fn update_info(&mut self, text: &str) {
        report(&mut self.step, &mut self.progress, text);
    }

    /// Check permissions, then create groups, sort and renumber
    pub fn run(&mut self, product: &mut Product) -> Result<TaskReport> {
        Permissions::new(self.config, self.logon.as_str()).check_all()?;

        let groups = self.create_groups(product)?;
        let sort = self.sort_nodes(product)?;
        let renumber = self.renumber_nodes(product)?;

        Ok(TaskReport { groups, sort, renumber })
    }

    fn create_groups(&mut self, product: &mut Product) -> Result<Vec<String>> {
        self.update_info("Creating groups...");
        if !self.config.tree.create_groups {
            tracing::info!("Skipped creating groups.");
            return Ok(Vec::new());
        }

        let synthesis = GroupSynthesis::new(&self.config.tree, &self.config.props);
        let created = synthesis.create(product).map_err(|e| {
            tracing::error!(error = %e, "Failed to create groups. Maybe some nodes in the tree are invalid.");
            ReorderError::group_creation(e)
        })?;

        match self.host.exclude_from_bom(product, &created) {
            Ok(()) => {}
            // The placeholders exist either way; only the BOM flag is missing
            Err(e @ ReorderError::WindowNotConnected { .. }) => {
                tracing::warn!(error = %e, "Cannot exclude group identifiers from the BOM");
            }
            Err(e) => return Err(ReorderError::group_creation(e)),
        }

        Ok(created)
    }

    fn sort_nodes(&mut self, product: &mut Product) -> Result<ApplyStats> {
        self.update_info("Connecting to graph tree window...");

        // The order is computed from the tree, not from the dialog rows
        tracing::info!("Gathering processable products from assembly...");
        let mut canonical: Vec<Node> = product.processable().into_iter().cloned().collect();
        if self.config.debug {
            let names: Vec<&str> = canonical.iter().map(|n| n.instance_name.as_str()).collect();
            tracing::debug!(items = ?names, "Processable items");
        }

        tracing::info!("Pre-sorting items from assembly...");
        let filter = Filter::new(self.config.tree.filter, self.config.props.clone());
        filter.sort(&mut canonical);
        if self.config.debug {
            for node in &canonical {
                tracing::debug!(node = %node.instance_name, key = %filter.key(node), "Filter key");
            }
        }

        let matcher = Matcher::from_config(&self.config.tree);
        let dialog = self.host.connect_reorder_dialog(product, &self.config.dialog)?;
        let mut session = DialogSession::new(dialog);

        report(&mut self.step, &mut self.progress, "Sorting all nodes in the graph tree...");
        let stats = reorder_in_dialog(&mut session, &matcher, &canonical).map_err(|e| {
            tracing::error!(error = %e, "Failed to sort nodes");
            ReorderError::sort_failed(e)
        })?;

        session.commit().map_err(ReorderError::sort_failed)?;
        Ok(stats)
    }

    fn renumber_nodes(&mut self, product: &mut Product) -> Result<Option<RenumberReport>> {
        self.update_info("Renumbering all nodes...");
        if !self.config.tree.renumber {
            tracing::info!("Skipped renumbering product nodes.");
            return Ok(None);
        }

        renumber::renumber(product, self.config.tree.start_index)
            .map(Some)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to renumber nodes");
                ReorderError::renumber_failed(e)
            })
    }
}
