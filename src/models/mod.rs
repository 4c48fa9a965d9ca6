mod client;
mod event;
mod invoice;
mod money;
mod project;

pub use client::{Client, ClientStatus};
pub use event::{Event, EventTime};
pub use invoice::{DueDate, Invoice, InvoiceId, InvoiceStatus};
pub use money::{format_amount, parse_amount};
pub use project::{Project, ProjectStatus};

/// Id for a newly created client, project or event.
///
/// Milliseconds since the epoch: unique enough for a single user in a
/// single window, but two windows creating records in the same millisecond
/// will collide. Nothing downstream relies on ids being unique.
pub fn timestamp_id() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
