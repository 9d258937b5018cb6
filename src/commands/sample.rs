use anyhow::{Context, Result};
use std::path::PathBuf;

use bannerwheel::config::Config;
use bannerwheel::pool::AdPool;
use bannerwheel::selection::SelectionService;

/// Print selections as JSON without starting a server
pub fn sample(
    config: Config,
    catalog: Option<PathBuf>,
    seed: Option<u64>,
    size: Option<usize>,
    count: usize,
) -> Result<()> {
    let catalog = catalog.or(config.server.catalog_path);
    let pool = match &catalog {
        Some(path) => AdPool::from_file(path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))?,
        None => AdPool::builtin(),
    };

    let mut service =
        SelectionService::new(pool).with_size(size.unwrap_or(config.server.selection_size));
    if let Some(seed) = seed.or(config.server.seed) {
        service = service.with_seed(seed);
    }

    tracing::debug!(
        pool_size = service.pool().len(),
        size = service.size(),
        count,
        "Sampling selections"
    );

    for _ in 0..count {
        let selection = service.next_selection();
        let json = serde_json::to_string_pretty(&selection).context("Failed to encode selection")?;
        println!("{json}");
    }

    Ok(())
}
