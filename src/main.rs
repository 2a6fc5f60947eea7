use std::io;
use std::time::Instant;
use tm35fin_pages::{
    GridConfig, PageGrid, PageRecord, PagesError, ProjReprojector, ReprojectorPool, init_logging,
    par_project, write_features,
};
use tracing::{debug, info};

fn main() -> Result<(), PagesError> {
    init_logging()?;
    let started = Instant::now();

    let grid = PageGrid::new(GridConfig::default())?;
    let pool = ReprojectorPool::new(ProjReprojector::new)?;
    info!(
        levels = grid.max_level() + 1,
        reprojectors = pool.len(),
        "projecting map pages"
    );

    // One top-level subtree in memory at a time, written in enumeration order
    let mut out = io::stdout().lock();
    let mut written = 0;
    for top in grid.enumerate_top_level() {
        let code = top.identifier.clone();
        let pages: Vec<PageRecord> = grid.subtree(top).collect();
        let features = par_project(grid.config(), &pages, &pool)?;
        written += write_features(&features, &mut out)?;
        debug!(top_level = %code, features = features.len(), "wrote subtree");
    }

    info!(
        features = written,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "wrote features"
    );

    Ok(())
}
