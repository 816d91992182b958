//! Column conversions used by the cleaning rules.

use crate::error::{EtlError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Parse a string column into `Datetime(µs)`, trying each of `formats` in turn.
///
/// Nulls stay null. A format without a time component parses as midnight. Any
/// non-null value that matches none of the formats is an error naming it.
pub(crate) fn parse_datetime(series: &Series, formats: &[&str]) -> Result<Series> {
    match series.dtype() {
        DataType::Datetime(TimeUnit::Microseconds, None) => return Ok(series.clone()),
        DataType::Datetime(_, _) | DataType::Date => {
            return Ok(series.cast(&DataType::Datetime(TimeUnit::Microseconds, None))?);
        }
        _ => {}
    }

    let as_str = series.cast(&DataType::String)?;
    let str_series = as_str.str()?;
    let mut micros: Vec<Option<i64>> = Vec::with_capacity(str_series.len());

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let parsed = parse_with_formats(val.trim(), formats).ok_or_else(|| {
                    EtlError::Polars(polars_err!(
                        ComputeError: "cannot parse '{}' in column '{}' as any of {:?}",
                        val, series.name(), formats
                    ))
                })?;
                micros.push(Some(parsed.and_utc().timestamp_micros()));
            }
            None => micros.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?)
}

fn parse_with_formats(val: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(val, format).ok().or_else(|| {
            NaiveDate::parse_from_str(val, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
    })
}

/// Replace nulls in a string column with `fill_value`.
pub(crate) fn fill_string_nulls(series: &Series, fill_value: &str) -> Result<Series> {
    let as_str = series.cast(&DataType::String)?;
    let filled: Vec<String> = as_str
        .str()?
        .into_iter()
        .map(|opt_val| opt_val.unwrap_or(fill_value).to_string())
        .collect();
    Ok(Series::new(series.name().clone(), filled))
}

/// Upper-case every value of a string column.
pub(crate) fn uppercase_strings(series: &Series) -> Result<Series> {
    let as_str = series.cast(&DataType::String)?;
    let upper: Vec<Option<String>> = as_str
        .str()?
        .into_iter()
        .map(|opt_val| opt_val.map(str::to_uppercase))
        .collect();
    Ok(Series::new(series.name().clone(), upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"];

    fn micros(val: &str) -> i64 {
        NaiveDateTime::parse_from_str(val, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
            .timestamp_micros()
    }

    fn parsed_micros(parsed: &Series) -> Vec<Option<i64>> {
        parsed
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_parse_datetime() {
        let series = Series::new(
            "ts".into(),
            &[Some("2017-10-02 10:56:33"), None, Some("2018-07-24 20:41:37")],
        );
        let parsed = parse_datetime(&series, FORMATS).unwrap();

        assert_eq!(
            parsed.dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        assert_eq!(parsed.null_count(), 1);
        assert_eq!(
            parsed_micros(&parsed),
            vec![
                Some(micros("2017-10-02 10:56:33")),
                None,
                Some(micros("2018-07-24 20:41:37"))
            ]
        );
    }

    #[test]
    fn test_parse_datetime_accepts_iso_variants() {
        let series = Series::new(
            "ts".into(),
            &["2017-10-02T10:56:33", "2017-10-02", "2017-10-02 10:56:33"],
        );
        let parsed = parse_datetime(&series, FORMATS).unwrap();

        assert_eq!(
            parsed_micros(&parsed),
            vec![
                Some(micros("2017-10-02 10:56:33")),
                Some(micros("2017-10-02 00:00:00")),
                Some(micros("2017-10-02 10:56:33"))
            ]
        );
    }

    #[test]
    fn test_parse_datetime_fractional_seconds() {
        let series = Series::new("ts".into(), &["2017-10-02 10:56:33.250"]);
        let parsed = parse_datetime(&series, &["%Y-%m-%d %H:%M:%S%.f"]).unwrap();
        assert_eq!(
            parsed_micros(&parsed),
            vec![Some(micros("2017-10-02 10:56:33") + 250_000)]
        );
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let series = Series::new("ts".into(), &["2017-10-02 10:56:33", "yesterday"]);
        let err = parse_datetime(&series, FORMATS).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_fill_string_nulls() {
        let series = Series::new("cat".into(), &[Some("perfumaria"), None]);
        let filled = fill_string_nulls(&series, "Unknown").unwrap();
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("perfumaria"), Some("Unknown")]);
    }

    #[test]
    fn test_uppercase_strings() {
        let series = Series::new("state".into(), &[Some("sp"), Some("Rj"), Some(" mg"), None]);
        let upper = uppercase_strings(&series).unwrap();
        let values: Vec<Option<&str>> = upper.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("SP"), Some("RJ"), Some(" MG"), None]);
    }
}
