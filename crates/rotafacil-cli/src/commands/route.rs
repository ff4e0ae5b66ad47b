//! Route command handler: computes the round trip for the saved waypoints.

use anyhow::{Context, Result};

use crate::commands::GlobalOptions;
use crate::output::{render_json, render_route, OutputFormat, RouteReport};
use crate::terminal::ColorPalette;

pub async fn handle_route(opts: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let mut session = opts.open_session()?;
    let orchestrator = opts.orchestrator()?;

    let result = session
        .compute_route(&orchestrator)
        .await
        .context("failed to compute route")?;
    let summary = session
        .summary()
        .context("route summary unavailable after computation")?;
    let directions_url = session.directions_url();

    match format {
        OutputFormat::Json => render_json(&RouteReport {
            route: &result,
            summary: &summary,
            directions_url,
        })?,
        OutputFormat::Text => print!(
            "{}",
            render_route(
                &result,
                &summary,
                directions_url.as_deref(),
                &ColorPalette::detect()
            )
        ),
    }
    Ok(())
}
