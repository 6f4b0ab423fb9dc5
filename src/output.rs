use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::pollers::PollResult;

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct SegmentRow {
    #[tabled(rename = "Segment")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub fn segment_table<K, V>(segments: impl IntoIterator<Item = (K, V)>) -> String
where
    K: Into<String>,
    V: Into<String>,
{
    let rows: Vec<SegmentRow> = segments
        .into_iter()
        .map(|(key, value)| SegmentRow {
            key: key.into(),
            value: value.into(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line summary of a finished wait.
pub fn poll_summary(result: &PollResult, attempts: u32) -> String {
    let http = result
        .response
        .as_ref()
        .map(|r| format!(" (last HTTP status {})", r.status.as_u16()))
        .unwrap_or_default();
    format!("{} after {} poll(s){}", result.status, attempts, http)
}
