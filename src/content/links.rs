// file: src/content/links.rs
use crate::models::RichText;
use log::debug;

/// Placeholder used when a cell carries no text at all.
pub const NONE_TEXT: &str = "None";

/// Folds hyperlinks carried by rich-text runs into the display text.
///
/// A linked run is rewritten in place as `text: url` (or just `url` when the run text
/// is blank), unless the url already appears verbatim, so repeated runs never double it.
pub fn extract_links(rich: Option<&RichText>, plain: &str) -> String {
    let rich = match rich {
        Some(rich) => rich,
        None => {
            return if plain.is_empty() {
                NONE_TEXT.to_string()
            } else {
                plain.to_string()
            };
        }
    };

    let mut result = if plain.is_empty() {
        rich.text.clone()
    } else {
        plain.to_string()
    };

    for (index, run) in rich.runs.iter().enumerate() {
        let url = match run.link.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => continue,
        };

        debug!("Found hyperlink in run {}: {:?} -> {}", index, run.text, url);

        if result.contains(url) {
            continue;
        }

        let formatted = if run.text.trim().is_empty() {
            url.to_string()
        } else {
            format!("{}: {}", run.text, url)
        };
        result = result.replacen(&run.text, &formatted, 1);
    }

    result
}
