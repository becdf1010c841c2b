use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Display locale for dates and the edited annotation.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
pub enum Locale {
    #[default]
    #[strum(serialize = "pt-BR")]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[strum(serialize = "en-US")]
    #[serde(rename = "en-US")]
    EnUs,
}

impl From<Locale> for chrono::Locale {
    fn from(value: Locale) -> Self {
        match value {
            Locale::PtBr => chrono::Locale::pt_BR,
            Locale::EnUs => chrono::Locale::en_US,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormatter {
    locale: Locale,
    offset: FixedOffset,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Locale::default(), Utc.fix())
    }
}

impl DateFormatter {
    pub fn new(locale: Locale, offset: FixedOffset) -> Self {
        Self { locale, offset }
    }

    pub fn from_offset_hours(
        locale: Locale,
        utc_offset_hours: i32,
    ) -> anyhow::Result<Self> {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!("utc offset out of range: {utc_offset_hours}")
            })?;

        Ok(Self::new(locale, offset))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Long form date, e.g. `25 mar 2021`.
    pub fn date(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format_localized("%d %b %Y", self.locale.into())
            .to_string()
    }

    pub fn time(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format("%H:%M")
            .to_string()
    }

    /// Empty unless the post was modified after its first publication.
    pub fn edited_note(
        &self,
        first_publication_date: Option<DateTime<Utc>>,
        last_publication_date: Option<DateTime<Utc>>,
    ) -> String {
        let (Some(first), Some(last)) =
            (first_publication_date, last_publication_date)
        else {
            return String::new();
        };
        if first == last {
            return String::new();
        }

        let date = self.date(last);
        let time = self.time(last);
        match self.locale {
            Locale::PtBr => format!("* editado em {date}, às {time}"),
            Locale::EnUs => format!("* edited on {date} at {time}"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn timestamp(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, d, h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(Locale::from_str("pt-BR").unwrap(), Locale::PtBr);
        assert_eq!(Locale::from_str("en-US").unwrap(), Locale::EnUs);
        assert!(Locale::from_str("klingon").is_err());
        assert_eq!(Locale::EnUs.to_string(), "en-US");
    }

    #[test]
    fn test_date() {
        let formatter = DateFormatter::new(Locale::EnUs, Utc.fix());

        assert_eq!(formatter.date(timestamp(25, 19, 25)), "25 Mar 2021");
    }

    #[test]
    fn test_date_uses_offset() {
        // Arrange
        let formatter =
            DateFormatter::from_offset_hours(Locale::EnUs, -3).unwrap();

        // Act
        let date = formatter.date(timestamp(25, 1, 0));
        let time = formatter.time(timestamp(25, 1, 0));

        // Assert
        assert_eq!(date, "24 Mar 2021");
        assert_eq!(time, "22:00");
    }

    #[test]
    fn test_offset_out_of_range() {
        assert!(DateFormatter::from_offset_hours(Locale::PtBr, 48).is_err());
    }

    #[test]
    fn test_edited_note_empty_when_unchanged() {
        let formatter = DateFormatter::default();
        let published = timestamp(25, 19, 25);

        assert_eq!(formatter.edited_note(Some(published), Some(published)), "");
        assert_eq!(formatter.edited_note(None, Some(published)), "");
        assert_eq!(formatter.edited_note(Some(published), None), "");
    }

    #[test]
    fn test_edited_note_contains_last_modified_date() {
        // Arrange
        let formatter = DateFormatter::new(Locale::EnUs, Utc.fix());
        let published = timestamp(25, 19, 25);
        let edited = timestamp(27, 15, 49);

        // Act
        let note = formatter.edited_note(Some(published), Some(edited));

        // Assert
        assert_eq!(note, "* edited on 27 Mar 2021 at 15:49");
    }

    #[test]
    fn test_edited_note_pt_br() {
        let formatter = DateFormatter::default();

        let note = formatter.edited_note(
            Some(timestamp(25, 19, 25)),
            Some(timestamp(27, 15, 49)),
        );

        assert!(note.starts_with("* editado em 27 "));
        assert!(note.contains("2021"));
        assert!(note.ends_with("às 15:49"));
    }
}
