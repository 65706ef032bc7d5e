// Event text: titles and identity keys, hyperlink folding, generated descriptions
// and the manual-notes region people add below them.

pub mod annotations;
pub mod description;
pub mod links;
pub mod title;

pub use annotations::merge_descriptions;
pub use description::{compose_description, CLOSING_MARKER, WARNING_MARKER};
pub use links::extract_links;
pub use title::{event_title, normalize_event_title, EventKey};
