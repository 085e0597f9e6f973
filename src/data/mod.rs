/// Data layer: loading, cleaning, selection and splitting.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ObservationTable (raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  coerce → drop missing → outliers → NumericTable
///   └──────────┘
///        │  select(features, target)
///        ▼
///   ┌──────────┐
///   │  split    │  seeded shuffle → SplitDataset
///   └──────────┘
/// ```

pub mod clean;
pub mod loader;
pub mod model;
pub mod split;

pub use clean::preprocess;
pub use loader::load_table;
pub use model::{CellValue, NumericTable, ObservationTable};
pub use split::{train_test_split, SplitDataset};
