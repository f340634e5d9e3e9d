//! Polars cell helpers.
//!
//! Survey tables arrive as free text, but after encoding the same column may
//! hold integers, floats or strings. These helpers give every consumer one
//! consistent view of a cell: as text (the way the encoding engine looks it up)
//! or as a number (the way the comparator aggregates it).

use polars::prelude::*;

/// Renders a Polars `AnyValue` as text, or `None` for nulls.
///
/// Floats are printed without a trailing `.0` so that an encoded `1.0`
/// renders as `"1"` in tables and category labels.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use survey_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::Int64(3)).as_deref(), Some("3"));
/// assert_eq!(any_to_text(AnyValue::Float64(2.0)).as_deref(), Some("2"));
/// assert_eq!(any_to_text(AnyValue::String("Sí")).as_deref(), Some("Sí"));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    };
    Some(text)
}

/// Formats a float without a trailing fractional zero.
///
/// # Examples
///
/// ```
/// use survey_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(2.5), "2.5");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Converts an `AnyValue` to `f64`, returning `None` for nulls and non-numeric text.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for empty or invalid input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Returns true for integer and floating point dtypes.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Reads a column as its string representation, preserving nulls.
///
/// The column is cast to `String` first, so an `Int64` value `1` becomes
/// `"1"` and a `Float64` value `1.0` becomes `"1.0"`.
pub fn column_text_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let casted = column.cast(&DataType::String)?;
    let values = casted.str()?;
    Ok(values
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Reads a column as display labels, preserving nulls.
///
/// Unlike [`column_text_values`], floats render through [`format_numeric`],
/// so an encoded `1.0` is labelled `"1"`.
pub fn column_display_values(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(any_to_text(column.get(idx)?));
    }
    Ok(values)
}

/// Reads a column as `f64`, mapping nulls and unparseable text to `None`.
pub fn column_f64_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(any_to_f64(column.get(idx)?));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_text_null() {
        assert_eq!(any_to_text(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_text_numbers() {
        assert_eq!(any_to_text(AnyValue::Int32(42)).as_deref(), Some("42"));
        assert_eq!(any_to_text(AnyValue::Float64(1.5)).as_deref(), Some("1.5"));
        assert_eq!(any_to_text(AnyValue::Float64(20.0)).as_deref(), Some("20"));
    }

    #[test]
    fn test_any_to_text_boolean() {
        assert_eq!(any_to_text(AnyValue::Boolean(true)).as_deref(), Some("true"));
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int64(7)), Some(7.0));
        assert_eq!(any_to_f64(AnyValue::String(" 2.5 ")), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::String("Sí")), None);
    }

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float32));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_column_text_values_keeps_nulls() {
        let column = Column::new("q".into(), vec![Some(1i64), None, Some(0)]);
        let values = column_text_values(&column).unwrap();
        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("0".to_string())]
        );
    }

    #[test]
    fn test_column_display_values() {
        let column = Column::new("t".into(), vec![Some(1.0f64), None, Some(0.0)]);
        let values = column_display_values(&column).unwrap();
        assert_eq!(
            values,
            vec![Some("1".to_string()), None, Some("0".to_string())]
        );
    }

    #[test]
    fn test_column_f64_values() {
        let column = Column::new("q".into(), vec![Some("3"), None, Some("x")]);
        let values = column_f64_values(&column).unwrap();
        assert_eq!(values, vec![Some(3.0), None, None]);
    }
}
