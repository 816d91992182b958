//! Data-integrity checks run by the transformer.

use crate::error::{EtlError, Result};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;

static STATE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());

/// Fail with [`EtlError::ColumnNotFound`] unless `df` has every column in `columns`.
pub fn require_columns(df: &DataFrame, table: &str, columns: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    for column in columns {
        if !present.iter().any(|name| name.as_str() == *column) {
            return Err(EtlError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Number of distinct non-null keys that occur on more than one row.
pub fn duplicate_key_count(df: &DataFrame, key: &str) -> Result<usize> {
    let keys = df
        .column(key)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in keys.str()?.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }

    Ok(counts.values().filter(|&&count| count > 1).count())
}

/// Counts of state codes that break the two-letter upper-case convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCodeCheck {
    /// Non-null values not matching `^[A-Z]{2}$`.
    pub invalid: usize,
    /// Null values.
    pub missing: usize,
}

pub fn check_state_codes(series: &Series) -> Result<StateCodeCheck> {
    let as_str = series.cast(&DataType::String)?;
    let mut check = StateCodeCheck::default();
    for opt_val in as_str.str()?.into_iter() {
        match opt_val {
            Some(val) if !STATE_CODE.is_match(val) => check.invalid += 1,
            Some(_) => {}
            None => check.missing += 1,
        }
    }
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns() {
        let df = df!("product_id" => &["p1"]).unwrap();
        assert!(require_columns(&df, "products", &["product_id"]).is_ok());

        let err = require_columns(&df, "products", &["product_id", "product_category_name"])
            .unwrap_err();
        assert!(matches!(
            err,
            EtlError::ColumnNotFound { ref column, .. } if column == "product_category_name"
        ));
    }

    #[test]
    fn test_duplicate_key_count() {
        let df = df!(
            "product_id" => &[Some("p1"), Some("p2"), Some("p1"), Some("p3"), Some("p3"), Some("p3"), None, None]
        )
        .unwrap();
        assert_eq!(duplicate_key_count(&df, "product_id").unwrap(), 2);

        let unique = df!("product_id" => &["p1", "p2"]).unwrap();
        assert_eq!(duplicate_key_count(&unique, "product_id").unwrap(), 0);
    }

    #[test]
    fn test_check_state_codes() {
        let series = Series::new(
            "customer_state".into(),
            &[Some("SP"), Some("RJ"), Some("SAO"), Some("s1"), None],
        );
        let check = check_state_codes(&series).unwrap();
        assert_eq!(check, StateCodeCheck { invalid: 2, missing: 1 });
    }
}
