//! Age derivation from birth dates.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use survey_common::column_text_values;
use tracing::debug;

use crate::error::{Result, TransformError};

/// Day-first format used by the questionnaire's birth date field.
pub const BIRTH_DATE_FORMAT: &str = "%d/%m/%Y";

/// Whole years between `birth_date` and `today`.
///
/// One year is subtracted when this year's birthday has not happened yet.
/// Returns `None` when the text is not a valid `dd/mm/yyyy` date.
pub fn calculate_age(birth_date: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), BIRTH_DATE_FORMAT).ok()?;
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Add (or replace) an Int32 `target` column with ages computed from `source`.
///
/// Unparseable and null birth dates give null ages.
///
/// # Returns
///
/// Number of rows with a derived age.
pub fn derive_age_column(
    df: &mut DataFrame,
    source: &str,
    target: &str,
    today: NaiveDate,
) -> Result<usize> {
    let column = df
        .column(source)
        .map_err(|_| TransformError::ColumnNotFound {
            column: source.to_string(),
        })?;
    let ages: Vec<Option<i32>> = column_text_values(column)?
        .iter()
        .map(|cell| cell.as_deref().and_then(|text| calculate_age(text, today)))
        .collect();
    let derived = ages.iter().filter(|age| age.is_some()).count();

    df.with_column(Column::new(target.into(), ages))?;
    debug!(source, target, derived, "derived age column");
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birthday_already_passed() {
        assert_eq!(calculate_age("15/03/2000", day(2024, 6, 1)), Some(24));
    }

    #[test]
    fn test_birthday_not_yet() {
        assert_eq!(calculate_age("15/03/2000", day(2024, 3, 14)), Some(23));
    }

    #[test]
    fn test_on_birthday() {
        assert_eq!(calculate_age("15/03/2000", day(2024, 3, 15)), Some(24));
    }

    #[test]
    fn test_leap_day_birth() {
        assert_eq!(calculate_age("29/02/2004", day(2023, 2, 28)), Some(18));
        assert_eq!(calculate_age("29/02/2004", day(2023, 3, 1)), Some(19));
    }

    #[test]
    fn test_invalid_dates() {
        let today = day(2024, 1, 1);
        assert_eq!(calculate_age("2000-03-15", today), None);
        assert_eq!(calculate_age("31/02/2000", today), None);
        assert_eq!(calculate_age("", today), None);
    }

    #[test]
    fn test_derive_age_column() {
        let mut df = DataFrame::new(vec![
            Series::new(
                "Fecha de nacimiento".into(),
                vec![Some("01/01/2000"), Some("no sé"), None],
            )
            .into(),
        ])
        .unwrap();

        let derived =
            derive_age_column(&mut df, "Fecha de nacimiento", "Edad", day(2024, 6, 1)).unwrap();

        assert_eq!(derived, 1);
        assert_eq!(df.column("Edad").unwrap().dtype(), &DataType::Int32);
        let ages: Vec<Option<i32>> = df
            .column("Edad")
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ages, vec![Some(24), None, None]);
    }

    #[test]
    fn test_derive_age_missing_source() {
        let mut df =
            DataFrame::new(vec![Series::new("x".into(), vec!["1"]).into()]).unwrap();
        let result = derive_age_column(&mut df, "Fecha", "Edad", day(2024, 1, 1));
        assert!(matches!(result, Err(TransformError::ColumnNotFound { .. })));
    }
}
