//! Shared helper functions for CLI commands

use miette::Result;
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::{Config, Product};
use crate::logging;

/// Load the effective config for a product file and start logging with it
pub fn setup(global: &GlobalOpts, product_path: Option<&Path>) -> Result<Config> {
    let start_dir = product_path
        .and_then(|p| p.parent())
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p });

    let config = Config::load(start_dir, global.config.as_deref())?;
    logging::init(logging::default_level(global.verbose, global.quiet, config.debug));
    Ok(config)
}

/// Load a product file with diagnostics
pub fn load_product(path: &Path) -> Result<Product> {
    Ok(Product::load(path)?)
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
