//! Calendar dates stamped on records.
//!
//! Older collections carry locale-formatted dates (`10/18/2024`,
//! `18/10/2024`) that cannot be parsed unambiguously. They are kept
//! verbatim instead of failing the record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    /// `YYYY-MM-DD`.
    Iso(NaiveDate),
    /// Any other text, round-tripped unchanged.
    Text(String),
}

impl RecordDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Iso(date) => Some(*date),
            Self::Text(_) => None,
        }
    }
}

impl From<NaiveDate> for RecordDate {
    fn from(value: NaiveDate) -> Self {
        Self::Iso(value)
    }
}

impl Display for RecordDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iso(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RecordDate;
    use chrono::NaiveDate;

    #[test]
    fn iso_dates_parse_and_locale_text_is_kept() {
        let iso: RecordDate = serde_json::from_str("\"2024-10-18\"").unwrap();
        assert_eq!(iso.as_date(), NaiveDate::from_ymd_opt(2024, 10, 18));

        let locale: RecordDate = serde_json::from_str("\"18/10/2024\"").unwrap();
        assert_eq!(locale, RecordDate::Text("18/10/2024".to_string()));
        assert_eq!(serde_json::to_string(&locale).unwrap(), "\"18/10/2024\"");
        assert_eq!(locale.as_date(), None);
    }

    #[test]
    fn non_string_dates_are_rejected() {
        assert!(serde_json::from_str::<RecordDate>("20241018").is_err());
    }
}
