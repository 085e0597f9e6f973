use std::fmt;

use ndarray::{Array1, Array2, Axis};

// ---------------------------------------------------------------------------
// CellValue – a single raw cell of the input table
// ---------------------------------------------------------------------------

/// A raw cell as it came out of the input file. No numeric coercion happens
/// at load time; see [`CellValue::to_numeric`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Coerce to a number, treating anything unparseable (and NaN) as missing.
    pub fn to_numeric(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::Null => return None,
        };
        (!value.is_nan()).then_some(value)
    }
}

// ---------------------------------------------------------------------------
// ObservationTable – the loaded, untyped table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    /// Header in file order.
    pub columns: Vec<String>,
    /// Every row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl ObservationTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// NumericTable – the cleaned, fully numeric table
// ---------------------------------------------------------------------------

/// Cleaned table restricted to the required columns. No value is missing;
/// row order follows the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    pub columns: Vec<String>,
    /// Shape `(rows, columns.len())`.
    pub values: Array2<f64>,
}

impl NumericTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Gather the named columns, in the given order, into a feature matrix.
    pub fn features(&self, names: &[String]) -> Result<Array2<f64>, Vec<String>> {
        let indices = self.indices_of(names)?;
        Ok(self.values.select(Axis(1), &indices))
    }

    /// Feature matrix plus the parallel target vector.
    pub fn select(
        &self,
        features: &[String],
        target: &str,
    ) -> Result<(Array2<f64>, Array1<f64>), Vec<String>> {
        let x = self.features(features)?;
        let target_idx = self
            .column_index(target)
            .ok_or_else(|| vec![target.to_string()])?;
        let y = self.values.column(target_idx).to_owned();
        Ok((x, y))
    }

    fn indices_of(&self, names: &[String]) -> Result<Vec<usize>, Vec<String>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.column_index(name) {
                Some(i) => indices.push(i),
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(indices)
        } else {
            Err(missing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn numeric_coercion() {
        assert_eq!(CellValue::Text(" 1200 ".into()).to_numeric(), Some(1200.0));
        assert_eq!(CellValue::Text("n/a".into()).to_numeric(), None);
        assert_eq!(CellValue::Text("NaN".into()).to_numeric(), None);
        assert_eq!(CellValue::Number(2.5).to_numeric(), Some(2.5));
        assert_eq!(CellValue::Bool(true).to_numeric(), Some(1.0));
        assert_eq!(CellValue::Null.to_numeric(), None);
    }

    #[test]
    fn select_keeps_feature_order_and_rows() {
        let table = NumericTable {
            columns: vec!["a".into(), "b".into(), "y".into()],
            values: array![[1.0, 10.0, 100.0], [2.0, 20.0, 200.0]],
        };
        let (x, y) = table.select(&["b".into(), "a".into()], "y").unwrap();
        assert_eq!(x, array![[10.0, 1.0], [20.0, 2.0]]);
        assert_eq!(y, array![100.0, 200.0]);
    }

    #[test]
    fn select_reports_unknown_columns() {
        let table = NumericTable {
            columns: vec!["a".into()],
            values: array![[1.0]],
        };
        assert_eq!(table.features(&["z".into()]), Err(vec!["z".to_string()]));
    }
}
