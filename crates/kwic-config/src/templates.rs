//! The `.kwic.toml` template written by `kwic init`.
//!
//! `templates/config.toml` is a live configuration listing every setting with its
//! default; [`local_template`] disables it line by line so a fresh file changes nothing
//! until the user uncomments what they need.

/// Example configuration (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Returns the example configuration with every setting commented out.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Prefixes every setting and section header with `# `.
///
/// Blank lines and existing comments pass through unchanged.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
