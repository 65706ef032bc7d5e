// file: src/content/description.rs
use crate::content::links::extract_links;
use crate::content::title::date_string;
use crate::models::DeadlineItem;
use chrono::NaiveDate;

/// Closing sentence of every generated description. Sentinel for the annotation merger.
pub const CLOSING_MARKER: &str = "This is an automated reminder from the SRE Deadlines tracker.";

/// Present only when manual action is required and the item does not auto-renew.
/// Sentinel for the annotation merger.
pub const WARNING_MARKER: &str = "⚠️  MANUAL ACTION REQUIRED - This will not auto-renew!";

const LINKS_HEADER: &str = "🔗 LINKS & RESOURCES:";

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Builds the generated event body for an item whose expiry date is `expiry`.
pub fn compose_description(item: &DeadlineItem, expiry: NaiveDate) -> String {
    let mut description = String::new();

    if !item.links.trim().is_empty() {
        let links = extract_links(item.links_rich.as_ref(), &item.links);
        description.push_str(&format!("{}\n{}\n\n", LINKS_HEADER, links));
    }

    let notes = extract_links(item.renewal_notes_rich.as_ref(), &item.renewal_notes);
    let warning = if item.manual_action().is_set() && !item.auto_renew().is_set() {
        format!("\n{}", WARNING_MARKER)
    } else {
        String::new()
    };

    let block = format!(
        "\nItem: {name}\n\
         Type: {item_type}\n\
         Expiry/Due Date: {date}\n\
         Owner: {owner}\n\
         Status: {status}\n\
         Priority: {priority}\n\
         \n\
         Renewal Information:\n\
         • Auto Renews: {auto}\n\
         • Needs Manual Action: {manual}\n\
         • Renewal/Action Notes: {notes}\n\
         \n\
         {closing}\n\
         {warning}\n  ",
        name = item.name,
        item_type = item.item_type,
        date = date_string(expiry),
        owner = item.owner,
        status = item.status,
        priority = item.priority,
        auto = or_placeholder(&item.auto_renews),
        manual = or_placeholder(&item.needs_manual_action),
        notes = notes,
        closing = CLOSING_MARKER,
        warning = warning,
    );
    description.push_str(block.trim());

    description
}
