use serde::Serialize;

use crate::error::CliError;

/// Render a value as JSON on stdout. Logs go to stderr, so stdout stays
/// machine-readable.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
