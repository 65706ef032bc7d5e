//! iCalendar export of deadline events.

use crate::models::CalendarEvent;
use chrono::{Duration, NaiveDate};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

fn date_property(name: &str, date: NaiveDate) -> Property {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    prop
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@deadline-sync", event.id));
    ics_event.summary(&event.title);

    // All-day events end on the following day (DTEND is exclusive).
    ics_event.append_property(date_property("DTSTART", event.date));
    ics_event.append_property(date_property("DTEND", event.date + Duration::days(1)));

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    if let Some(created) = event.created_at {
        ics_event.add_property("CREATED", created.format("%Y%m%dT%H%M%SZ").to_string());
    }

    for minutes in &event.reminders {
        let trigger = Trigger::before_start(Duration::minutes(*minutes));
        ics_event.alarm(Alarm::display("Reminder", trigger));
    }

    ics_event.done()
}

/// Renders `events` as one VCALENDAR named `name`.
pub fn render_calendar(name: &str, events: &[CalendarEvent]) -> String {
    let mut cal = Calendar::new();
    cal.name(name);
    for event in events {
        cal.push(to_ics_event(event));
    }
    cal.done().to_string()
}
