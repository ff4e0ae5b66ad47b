//! Coordinate extraction from pasted map links.

use anyhow::Result;

use rotafacil_lib::{extract, Error as LibError, LinkMatch};

use crate::output::{render_extract, render_json, OutputFormat};

/// Print the coordinates found in `text`. Failing to find any is an error so
/// scripts can rely on the exit status.
pub fn handle_extract(text: &str, format: OutputFormat) -> Result<()> {
    let found = extract(text);
    if let LinkMatch::NoMatch = found {
        return Err(LibError::CoordinatesNotFound {
            input: text.trim().to_string(),
        }
        .into());
    }
    match format {
        OutputFormat::Json => render_json(&found)?,
        OutputFormat::Text => print!("{}", render_extract(&found)),
    }
    Ok(())
}
