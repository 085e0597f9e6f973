//! Terminal reporting. Results go to stdout; diagnostics go through `log`.

use ndarray::{ArrayView1, ArrayView2};
use serde_json::{Map, Value as JsonValue};

use crate::data::SplitDataset;
use crate::regression::formula::humanize;
use crate::regression::{Formula, ModelResults};

/// Formula, metrics and a sample of predictions for both partitions.
pub fn print_results(
    data: &SplitDataset,
    results: &ModelResults,
    feature_names: &[String],
    target_name: &str,
    sample_rows: usize,
) {
    let formula = Formula::from_model(&results.model);
    let title = if feature_names.len() == 1 {
        "Linear Regression Formula"
    } else {
        "Multiple Linear Regression Formula"
    };
    println!("\n{title}");
    println!("{}", formula.render(feature_names, target_name));

    print_metrics(results);

    println!("\nTraining Data Sample (first {sample_rows} rows):");
    print!(
        "{}",
        sample_table(
            data.x_train.view(),
            Some(data.y_train.view()),
            results.train.predictions.view(),
            feature_names,
            target_name,
            sample_rows,
        )
    );

    println!("\nTest Data Sample (first {sample_rows} rows):");
    print!(
        "{}",
        sample_table(
            data.x_test.view(),
            Some(data.y_test.view()),
            results.test.predictions.view(),
            feature_names,
            target_name,
            sample_rows,
        )
    );
}

pub fn print_metrics(results: &ModelResults) {
    println!("R-squared (training): {:.4}", results.train.r2);
    println!("R-squared (test): {:.4}", results.test.r2);
    println!("RMSE (training): {:.4}", results.train.rmse);
    println!("RMSE (test): {:.4}", results.test.rmse);
}

/// Output of predict-only mode.
pub fn print_predictions(
    x: ArrayView2<'_, f64>,
    predictions: ArrayView1<'_, f64>,
    feature_names: &[String],
    target_name: &str,
    sample_rows: usize,
) {
    println!("Length of predictions: {}", predictions.len());
    if predictions.is_empty() {
        return;
    }
    println!("\nPrediction Sample (first {sample_rows} rows):");
    print!(
        "{}",
        sample_table(x, None, predictions, feature_names, target_name, sample_rows)
    );
}

/// Summary of a metadata document loaded alongside a model.
pub fn print_metadata(metadata: &Map<String, JsonValue>) {
    if metadata.is_empty() {
        return;
    }
    println!("\nModel Metadata");
    for (key, value) in metadata {
        match value {
            JsonValue::Number(n) => match n.as_f64() {
                Some(v) => println!("  {key}: {v:.4}"),
                None => println!("  {key}: {n}"),
            },
            other => println!("  {key}: {other}"),
        }
    }
}

/// Fixed-width table: one column per feature, optional actual target, and the
/// prediction rounded to two decimals.
pub fn sample_table(
    x: ArrayView2<'_, f64>,
    actual: Option<ArrayView1<'_, f64>>,
    predicted: ArrayView1<'_, f64>,
    feature_names: &[String],
    target_name: &str,
    rows: usize,
) -> String {
    let target = humanize(target_name);
    let mut header: Vec<String> = feature_names.iter().map(|f| humanize(f)).collect();
    if actual.is_some() {
        header.push(format!("Actual {target}"));
    }
    header.push(format!("Predicted {target}"));

    let body: Vec<Vec<String>> = (0..x.nrows().min(rows))
        .map(|i| {
            let mut cells: Vec<String> = x.row(i).iter().map(|v| format_value(*v)).collect();
            if let Some(actual) = &actual {
                cells.push(format_value(actual[i]));
            }
            cells.push(format!("{:.2}", predicted[i]));
            cells
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(c, h)| {
            body.iter()
                .map(|row| row[c].len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in std::iter::once(&header).chain(body.iter()) {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:>w$}"))
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Integers without a trailing `.0`, everything else as-is.
fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
