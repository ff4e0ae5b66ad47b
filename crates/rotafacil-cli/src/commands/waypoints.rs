//! Registry commands: list, add, remove, clear and base.

use anyhow::{bail, Context, Result};

use rotafacil_lib::WaypointId;

use crate::commands::{parse_point, GlobalOptions};
use crate::output::{render_json, render_registry, render_waypoint_added, OutputFormat, RegistryReport};
use crate::terminal::ColorPalette;

/// Where the coordinates of a new waypoint come from.
#[derive(Debug, Clone)]
pub enum WaypointSource {
    Link(String),
    Manual { lat: String, lng: String },
}

pub fn handle_list(opts: &GlobalOptions, format: OutputFormat) -> Result<()> {
    let session = opts.open_session()?;
    match format {
        OutputFormat::Json => render_json(&RegistryReport {
            base: session.base(),
            waypoints: session.waypoints(),
        })?,
        OutputFormat::Text => print!(
            "{}",
            render_registry(session.base(), session.waypoints(), &ColorPalette::detect())
        ),
    }
    Ok(())
}

pub fn handle_add(
    opts: &GlobalOptions,
    name: Option<&str>,
    source: WaypointSource,
    format: OutputFormat,
) -> Result<()> {
    let mut session = opts.open_session()?;
    let waypoint = match source {
        WaypointSource::Link(text) => session.add_waypoint_from_link(name, &text)?,
        WaypointSource::Manual { lat, lng } => {
            let point = parse_point(&lat, &lng)?;
            session.add_waypoint(name, point.lat, point.lng)?
        }
    };
    match format {
        OutputFormat::Json => render_json(&waypoint)?,
        OutputFormat::Text => print!("{}", render_waypoint_added(&waypoint)),
    }
    Ok(())
}

pub fn handle_remove(opts: &GlobalOptions, id: u64) -> Result<()> {
    let mut session = opts.open_session()?;
    session
        .remove_waypoint(WaypointId(id))
        .with_context(|| format!("failed to remove waypoint {id}"))?;
    println!("Removed #{id}");
    Ok(())
}

pub fn handle_clear(opts: &GlobalOptions) -> Result<()> {
    let mut session = opts.open_session()?;
    let removed = session.clear_waypoints();
    println!("Removed {removed} waypoint(s)");
    Ok(())
}

pub fn handle_base(
    opts: &GlobalOptions,
    lat: Option<&str>,
    lng: Option<&str>,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = opts.open_session()?;
    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(parse_point(lat, lng)?),
        (None, None) => None,
        _ => bail!("--lat and --lng must be given together"),
    };
    session.update_base(location, name)?;

    let base = session.base();
    match format {
        OutputFormat::Json => render_json(base)?,
        OutputFormat::Text => println!("Base: {} ({})", base.name, base.location),
    }
    Ok(())
}
