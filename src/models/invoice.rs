use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::parse_amount;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid invoice id {0:?}, expected INV-NNN")]
pub struct InvoiceIdError(String);

/// Invoice number, stored as `INV-` followed by at least three digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceId(pub u32);

impl InvoiceId {
    pub fn number(self) -> u32 {
        self.0
    }

    /// The following id, or `None` once the number space is used up
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(InvoiceId)
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INV-{:03}", self.0)
    }
}

impl FromStr for InvoiceId {
    type Err = InvoiceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("INV-")
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(InvoiceId)
            .ok_or_else(|| InvoiceIdError(s.to_string()))
    }
}

impl TryFrom<String> for InvoiceId {
    type Error = InvoiceIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceId> for String {
    fn from(id: InvoiceId) -> Self {
        id.to_string()
    }
}

/// Due date of an invoice; drafts have none and store `-`
///
/// The derived `Ord` puts every `On` before `Unset`, which is what sorts
/// undated invoices last in the task feed. Keep `On` declared first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DueDate {
    On(NaiveDate),
    Unset,
}

impl DueDate {
    pub const SENTINEL: &'static str = "-";

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DueDate::On(date) => Some(date),
            DueDate::Unset => None,
        }
    }
}

impl From<Option<NaiveDate>> for DueDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(DueDate::Unset, DueDate::On)
    }
}

impl TryFrom<String> for DueDate {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim() == Self::SENTINEL {
            return Ok(DueDate::Unset);
        }
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map(DueDate::On)
    }
}

impl From<DueDate> for String {
    fn from(due: DueDate) -> Self {
        match due {
            DueDate::On(date) => date.format("%Y-%m-%d").to_string(),
            DueDate::Unset => DueDate::SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    #[default]
    Draft,
}

impl InvoiceStatus {
    pub fn label(self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Draft => "Draft",
        }
    }

    pub fn next(self) -> Self {
        match self {
            InvoiceStatus::Draft => InvoiceStatus::Pending,
            InvoiceStatus::Pending => InvoiceStatus::Paid,
            InvoiceStatus::Paid => InvoiceStatus::Overdue,
            InvoiceStatus::Overdue => InvoiceStatus::Draft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    /// Client name at the time the invoice was issued
    pub client: String,
    /// Currency string, e.g. `$2,400`
    pub amount: String,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
    pub due_date: DueDate,
}

impl Invoice {
    /// Amount as a number; unparsable amounts count as zero
    pub fn amount_value(&self) -> f64 {
        parse_amount(&self.amount)
    }

    /// Case-insensitive match against the invoice id and client name
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.id.to_string().to_lowercase().contains(&query)
            || self.client.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_zero_padded() {
        assert_eq!(InvoiceId(7).to_string(), "INV-007");
        assert_eq!(InvoiceId(0).to_string(), "INV-000");
        assert_eq!(InvoiceId(1234).to_string(), "INV-1234");
    }

    #[test]
    fn next_stops_at_the_largest_id() {
        assert_eq!(InvoiceId(7).next(), Some(InvoiceId(8)));

        let largest: InvoiceId = "INV-4294967295".parse().unwrap();
        assert_eq!(largest.next(), None);
    }

    #[test]
    fn dated_due_dates_sort_before_unset() {
        let dated = DueDate::On(NaiveDate::from_ymd_opt(2099, 12, 31).unwrap());
        assert!(dated < DueDate::Unset);
    }

    #[test]
    fn ids_parse_their_numeric_suffix() {
        assert_eq!("INV-007".parse(), Ok(InvoiceId(7)));
        assert_eq!("INV-1234".parse(), Ok(InvoiceId(1234)));
        assert!("INV-".parse::<InvoiceId>().is_err());
        assert!("INV-12a".parse::<InvoiceId>().is_err());
        assert!("7".parse::<InvoiceId>().is_err());
    }

    #[test]
    fn due_date_sentinel_round_trips() {
        let json = r#"{"id":"INV-004","client":"Acme","amount":"$800","status":"draft","date":"2025-05-01","dueDate":"-"}"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.due_date, DueDate::Unset);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(serde_json::to_string(&invoice).unwrap(), json);
    }

    #[test]
    fn malformed_due_date_is_rejected() {
        let json = r#"{"id":"INV-004","client":"Acme","amount":"$800","status":"draft","date":"2025-05-01","dueDate":"soon"}"#;
        assert!(serde_json::from_str::<Invoice>(json).is_err());
    }

    #[test]
    fn search_matches_id_and_client() {
        let invoice = Invoice {
            id: InvoiceId(12),
            client: "XYZ Technologies".into(),
            amount: "$1,800".into(),
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            due_date: DueDate::Unset,
        };
        assert!(invoice.matches("inv-012"));
        assert!(invoice.matches("xyz"));
        assert!(!invoice.matches("abc"));
        assert_eq!(invoice.amount_value(), 1800.0);
    }
}
