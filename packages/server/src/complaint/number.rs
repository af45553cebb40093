use chrono::NaiveDate;
use common::ComplaintKind;

/// Format a complaint number, e.g. `CC-20250315-0012`.
///
/// Pure: the caller supplies the day and the sequence value. Sequences above
/// 9999 widen the last group rather than wrapping.
pub fn complaint_number(kind: ComplaintKind, as_of: NaiveDate, sequence: u32) -> String {
    format!(
        "{}-{}-{:04}",
        kind.number_prefix(),
        as_of.format("%Y%m%d"),
        sequence
    )
}
