use ndarray::{Array2, ArrayView1, Axis};

use super::model::{NumericTable, ObservationTable};
use crate::config::CleaningOptions;

// ---------------------------------------------------------------------------
// Cleaning pipeline: coerce → drop missing → per-column outlier removal
// ---------------------------------------------------------------------------

/// Run every cleaning step on a loaded table.
///
/// The result keeps only `options.required_columns` (in that order), is fully
/// numeric, and has had outliers removed column by column. An empty result
/// is valid output.
pub fn preprocess(table: &ObservationTable, options: &CleaningOptions) -> NumericTable {
    log::info!("Preprocessing data...");
    let coerced = coerce_numeric(table, &options.required_columns);
    let complete = drop_missing(coerced);
    remove_outliers(complete, options.outlier_threshold)
}

/// Rows of optional numbers, one slot per requested column.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

/// Coerce the named columns to numbers; unparseable cells become `None`.
/// A column absent from the table yields `None` for every row.
pub fn coerce_numeric(table: &ObservationTable, columns: &[String]) -> CoercedTable {
    let indices: Vec<Option<usize>> = columns.iter().map(|c| table.column_index(c)).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            indices
                .iter()
                .map(|idx| idx.and_then(|i| row.get(i)).and_then(|cell| cell.to_numeric()))
                .collect()
        })
        .collect();
    CoercedTable {
        columns: columns.to_vec(),
        rows,
    }
}

/// Drop every row with at least one missing value.
pub fn drop_missing(table: CoercedTable) -> NumericTable {
    let n_cols = table.columns.len();
    let before = table.rows.len();

    let flat: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| row.iter().copied().collect::<Option<Vec<f64>>>())
        .flatten()
        .collect();
    let kept = if n_cols == 0 { 0 } else { flat.len() / n_cols };

    if kept < before {
        log::warn!("Missing values found, dropping {} rows", before - kept);
    }

    // flat.len() == kept * n_cols by construction
    let values = Array2::from_shape_vec((kept, n_cols), flat)
        .unwrap_or_else(|_| Array2::zeros((0, n_cols)));
    NumericTable {
        columns: table.columns,
        values,
    }
}

/// Remove outliers one column at a time, in column order.
///
/// Bounds for each column are `mean ± threshold·σ` (sample σ) computed over
/// the rows that survived the previous columns, so the outcome depends on
/// column order. Columns with fewer than two rows are left alone.
pub fn remove_outliers(mut table: NumericTable, threshold: f64) -> NumericTable {
    for col in 0..table.columns.len() {
        let Some((lower, upper)) = outlier_bounds(table.values.column(col), threshold) else {
            continue;
        };

        let keep: Vec<usize> = table
            .values
            .column(col)
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= lower && v <= upper)
            .map(|(i, _)| i)
            .collect();

        let removed = table.len() - keep.len();
        if removed > 0 {
            log::warn!("Removing {removed} outliers from {}", table.columns[col]);
            table.values = table.values.select(Axis(0), &keep);
        }
    }
    table
}

/// `(mean - k·σ, mean + k·σ)` for a column, or `None` when σ is undefined.
pub fn outlier_bounds(column: ArrayView1<'_, f64>, threshold: f64) -> Option<(f64, f64)> {
    if column.len() < 2 {
        return None;
    }
    let mean = column.mean()?;
    let std = column.std(1.0);
    if !mean.is_finite() || !std.is_finite() {
        return None;
    }
    Some((mean - threshold * std, mean + threshold * std))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use ndarray::array;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn options(columns: &[&str]) -> CleaningOptions {
        CleaningOptions {
            required_columns: columns.iter().map(|c| c.to_string()).collect(),
            outlier_threshold: 3.0,
        }
    }

    #[test]
    fn unparseable_and_missing_rows_are_dropped() {
        let table = ObservationTable {
            columns: vec!["sqft".into(), "note".into(), "price".into()],
            rows: vec![
                vec![text("1000"), text("ok"), text("200")],
                vec![text("big"), text("bad"), text("230")],
                vec![text("1500"), CellValue::Null, CellValue::Null],
                vec![text("1800"), CellValue::Null, text("300")],
            ],
        };

        let cleaned = preprocess(&table, &options(&["sqft", "price"]));
        assert_eq!(cleaned.columns, vec!["sqft", "price"]);
        assert_eq!(cleaned.values, array![[1000.0, 200.0], [1800.0, 300.0]]);
    }

    #[test]
    fn extreme_value_is_removed() {
        // Twenty ordinary rows and one wildly out-of-range square footage.
        let mut values: Vec<f64> = (0..20).flat_map(|i| [1000.0 + i as f64 * 10.0, 200.0]).collect();
        values.extend([50_000.0, 200.0]);
        let table = NumericTable {
            columns: vec!["sqft".into(), "price".into()],
            values: Array2::from_shape_vec((21, 2), values).unwrap(),
        };

        let cleaned = remove_outliers(table, 3.0);
        assert_eq!(cleaned.len(), 20);
        assert!(cleaned.values.column(0).iter().all(|&v| v < 50_000.0));
    }

    #[test]
    fn survivors_lie_within_bounds_at_time_of_filtering() {
        let mut values = Vec::new();
        for i in 0..30 {
            let sqft = 1000.0 + (i % 7) as f64 * 55.0;
            let beds = 2.0 + (i % 3) as f64;
            values.extend([sqft, beds]);
        }
        values.extend([9000.0, 3.0, 1200.0, 40.0]);
        let table = NumericTable {
            columns: vec!["sqft".into(), "beds".into()],
            values: Array2::from_shape_vec((32, 2), values).unwrap(),
        };
        let k = 3.0;
        let cleaned = remove_outliers(table.clone(), k);
        assert_eq!(cleaned.len(), 30);

        // Replay the sequential passes: every surviving value must sit inside
        // the bounds computed on the rows that reached its column.
        let mut current = table;
        for col in 0..2 {
            let (lower, upper) = outlier_bounds(current.values.column(col), k).unwrap();
            assert!(cleaned
                .values
                .column(col)
                .iter()
                .all(|&v| v >= lower && v <= upper));
            let keep: Vec<usize> = current
                .values
                .column(col)
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v >= lower && v <= upper)
                .map(|(i, _)| i)
                .collect();
            current.values = current.values.select(Axis(0), &keep);
        }
        assert_eq!(current.values, cleaned.values);
    }

    #[test]
    fn column_order_changes_outcome() {
        // Row P is extreme in both columns; row Q has a mildly high bedroom
        // count that P masks unless P was already removed by the sqft pass.
        let mut rows: Vec<[f64; 2]> = (0..12).map(|i| [1000.0 + i as f64, 3.0]).collect();
        rows.push([100_000.0, 20.0]);
        rows.push([1005.0, 6.0]);
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();

        let sqft_first = NumericTable {
            columns: vec!["sqft".into(), "beds".into()],
            values: Array2::from_shape_vec((rows.len(), 2), flat).unwrap(),
        };
        let beds_first = NumericTable {
            columns: vec!["beds".into(), "sqft".into()],
            values: sqft_first.values.select(Axis(1), &[1, 0]),
        };

        let a = remove_outliers(sqft_first, 3.0);
        let b = remove_outliers(beds_first, 3.0);
        assert_eq!(a.len(), 12);
        assert_eq!(b.len(), 13);
        assert!(b.values.column(0).iter().any(|&beds| beds == 6.0));
    }

    #[test]
    fn single_row_is_kept() {
        let table = NumericTable {
            columns: vec!["sqft".into()],
            values: array![[1000.0]],
        };
        assert_eq!(remove_outliers(table, 3.0).len(), 1);
    }

    #[test]
    fn everything_removed_is_not_an_error() {
        let table = ObservationTable {
            columns: vec!["sqft".into()],
            rows: vec![vec![text("n/a")], vec![CellValue::Null]],
        };
        let cleaned = preprocess(&table, &options(&["sqft"]));
        assert!(cleaned.is_empty());
        assert_eq!(cleaned.values.ncols(), 1);
    }
}
