//! Conversion between Polars frames and casewise types

use crate::{Error, Result};
use casewise_core::{Column as CaseColumn, Dataset};
use casewise_lm::AggregateResult;
use polars::prelude::*;

fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float64 | DataType::Float32)
}

fn is_integer(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int64
            | DataType::Int32
            | DataType::Int16
            | DataType::Int8
            | DataType::UInt64
            | DataType::UInt32
            | DataType::UInt16
            | DataType::UInt8
    )
}

fn is_numeric(dtype: &DataType) -> bool {
    is_float(dtype) || is_integer(dtype)
}

fn numeric_values(name: &str, column: &Column) -> Result<Vec<f64>> {
    if !is_numeric(column.dtype()) {
        return Err(Error::TypeMismatch {
            column: name.to_string(),
            expected: "numeric".to_string(),
            got: format!("{:?}", column.dtype()),
        });
    }
    let floats = column.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn text_values(column: &Column) -> Result<Vec<Option<String>>> {
    let strings = column.cast(&DataType::String)?;
    Ok(strings
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Copy the named columns of `df` into a [`Dataset`]
///
/// `columns` must be numeric; nulls become missing values. A float key
/// column stays numeric. Integer and other key columns are read as text so
/// that 64-bit ids never collapse through a float conversion.
pub fn dataset_from_frame(df: &DataFrame, columns: &[&str], key_column: &str) -> Result<Dataset> {
    let mut builder = Dataset::builder();

    let key = df
        .column(key_column)
        .map_err(|_| Error::InvalidColumn(key_column.to_string()))?;
    builder = if is_float(key.dtype()) {
        builder.numeric(key_column, numeric_values(key_column, key)?)
    } else {
        builder.column(key_column, CaseColumn::Text(text_values(key)?))
    };

    for &name in columns.iter().filter(|&&c| c != key_column) {
        let column = df
            .column(name)
            .map_err(|_| Error::InvalidColumn(name.to_string()))?;
        builder = builder.numeric(name, numeric_values(name, column)?);
    }

    Ok(builder.build()?)
}

/// One row per term: `term`, `estimate`, `n_cases`, `bootstrap_mean`,
/// `std_error`, `lower`, `upper`
pub fn pooled_frame(result: &AggregateResult) -> Result<DataFrame> {
    let terms = &result.terms;
    let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
    let n_cases: Vec<u32> = terms.iter().map(|t| t.n_cases as u32).collect();

    let df = DataFrame::new(vec![
        Series::new("term".into(), names).into(),
        Series::new(
            "estimate".into(),
            terms.iter().map(|t| t.estimate).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new("n_cases".into(), n_cases).into(),
        Series::new(
            "bootstrap_mean".into(),
            terms.iter().map(|t| t.bootstrap_mean).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "std_error".into(),
            terms.iter().map(|t| t.std_error).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "lower".into(),
            terms.iter().map(|t| t.interval.lower).collect::<Vec<f64>>(),
        )
        .into(),
        Series::new(
            "upper".into(),
            terms.iter().map(|t| t.interval.upper).collect::<Vec<f64>>(),
        )
        .into(),
    ])?;

    Ok(df)
}

/// One row per case: the key column, `n_obs`, then one column per term
pub fn case_coefficients_frame(result: &AggregateResult) -> Result<DataFrame> {
    let fits = &result.fits;
    let keys: Vec<&str> = fits.iter().map(|f| f.key.as_str()).collect();
    let n_obs: Vec<u32> = fits.iter().map(|f| f.n_obs as u32).collect();

    let mut columns: Vec<Column> = vec![
        Series::new(fits.key_column.as_str().into(), keys).into(),
        Series::new("n_obs".into(), n_obs).into(),
    ];
    for term in &fits.terms {
        let values: Vec<Option<f64>> = fits.iter().map(|f| f.coefficient(term)).collect();
        columns.push(Series::new(term.as_str().into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}
