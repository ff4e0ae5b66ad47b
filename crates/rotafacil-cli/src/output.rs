//! Output formatting for registry views, extraction results and routes.
//!
//! Text renderers return `String`s so they can be tested without capturing
//! stdout; JSON renderers write straight to stdout.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use rotafacil_lib::{
    BasePoint, LinkMatch, RouteResult, RouteStrategy, RouteSummary, StepKind, Waypoint,
};

use crate::terminal::ColorPalette;

/// Output format shared by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON shape of `route`.
#[derive(Debug, Serialize)]
pub struct RouteReport<'a> {
    pub route: &'a RouteResult,
    pub summary: &'a RouteSummary,
    pub directions_url: Option<String>,
}

/// JSON shape of `list`.
#[derive(Debug, Serialize)]
pub struct RegistryReport<'a> {
    pub base: &'a BasePoint,
    pub waypoints: &'a [Waypoint],
}

/// Serialize `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

pub fn render_registry(base: &BasePoint, waypoints: &[Waypoint], palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}BASE{} {}{}{} {}({}){}",
        p.tag_base, p.reset, p.white_bold, base.name, p.reset, p.gray, base.location, p.reset
    );
    if waypoints.is_empty() {
        let _ = writeln!(out, "No waypoints registered.");
        return out;
    }
    let _ = writeln!(out, "{} waypoint(s):", waypoints.len());
    for waypoint in waypoints {
        let _ = writeln!(
            out,
            "  {}#{}{} {} {}({}){}",
            p.gray, waypoint.id, p.reset, waypoint.name, p.gray, waypoint.location, p.reset
        );
    }
    out
}

pub fn render_waypoint_added(waypoint: &Waypoint) -> String {
    format!(
        "Added #{} {} ({})\n",
        waypoint.id, waypoint.name, waypoint.location
    )
}

pub fn render_extract(found: &LinkMatch) -> String {
    match found {
        LinkMatch::Matched { rule, point } => {
            format!("{}\nlat: {}\nlng: {}\nrule: {}\n", point, point.lat, point.lng, rule)
        }
        LinkMatch::NoMatch => "No coordinates found.\n".to_string(),
    }
}

pub fn render_route(
    result: &RouteResult,
    summary: &RouteSummary,
    directions_url: Option<&str>,
    palette: &ColorPalette,
) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route ({}): {}{}{}, {}{}{}, {} stop(s)",
        result.strategy,
        p.green,
        summary.distance_label,
        p.reset,
        p.green,
        summary.duration_label,
        p.reset,
        summary.stop_count
    );
    if result.strategy == RouteStrategy::SequentialFallback {
        let _ = writeln!(
            out,
            "{}note:{} optimizer unavailable; stops are visited in registration order",
            p.yellow, p.reset
        );
    }
    for step in &summary.steps {
        match (step.kind, step.order) {
            (StepKind::Stop, Some(order)) => {
                let _ = writeln!(
                    out,
                    "  {}{:>3}.{} {}",
                    p.tag_stop, order, p.reset, step.label
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "  {}BASE{} {}{}{}",
                    p.tag_base, p.reset, p.white_bold, step.label, p.reset
                );
            }
        }
    }
    if let Some(url) = directions_url {
        let _ = writeln!(out, "\nDirections: {}", url);
    }
    out
}
