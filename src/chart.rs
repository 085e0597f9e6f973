//! Chart data for the fitted model: scatter points, one regression line per
//! feature, and the regression plane when there are exactly two features.
//! Rendering is left to whatever reads the exported JSON.

use std::path::Path;

use anyhow::Context;
use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::data::SplitDataset;
use crate::error::FitError;
use crate::regression::{FittedModel, Formula};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub formula: String,
    pub train_points: Vec<Vec<f64>>,
    pub test_points: Vec<Vec<f64>>,
    pub lines: Vec<RegressionLine>,
    pub surface: Option<RegressionSurface>,
}

/// Prediction along one feature with every other feature held at its mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionLine {
    pub feature: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// `z[i][j]` is the prediction at `(x[j], y[i])`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSurface {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<f64>>,
}

impl ChartData {
    pub fn build(
        data: &SplitDataset,
        model: &FittedModel,
        feature_names: &[String],
        target_name: &str,
        line_points: usize,
        grid_size: usize,
    ) -> Result<Self, FitError> {
        let combined = data.combined_features()?;
        if combined.nrows() == 0 {
            return Err(FitError::EmptyInput("build chart data"));
        }
        let means = combined
            .mean_axis(Axis(0))
            .ok_or(FitError::EmptyInput("build chart data"))?;
        let ranges: Vec<(f64, f64)> = combined
            .columns()
            .into_iter()
            .map(|col| {
                let lo = col.iter().copied().fold(f64::INFINITY, f64::min);
                let hi = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (lo, hi)
            })
            .collect();

        let mut lines = Vec::with_capacity(ranges.len());
        for (i, &(lo, hi)) in ranges.iter().enumerate() {
            let xs = Array1::linspace(lo, hi, line_points);
            let mut grid = Array2::from_shape_fn((line_points, means.len()), |(_, j)| means[j]);
            grid.column_mut(i).assign(&xs);
            let ys = model.predict(grid.view())?;
            lines.push(RegressionLine {
                feature: feature_names.get(i).cloned().unwrap_or_else(|| format!("x{i}")),
                x: xs.to_vec(),
                y: ys.to_vec(),
            });
        }

        let surface = match ranges.as_slice() {
            [(x_lo, x_hi), (y_lo, y_hi)] => {
                let xs = Array1::linspace(*x_lo, *x_hi, grid_size);
                let ys = Array1::linspace(*y_lo, *y_hi, grid_size);
                let grid_points = Array2::from_shape_fn((grid_size * grid_size, 2), |(k, c)| {
                    if c == 0 {
                        xs[k % grid_size]
                    } else {
                        ys[k / grid_size]
                    }
                });
                let z = model.predict(grid_points.view())?;
                Some(RegressionSurface {
                    x: xs.to_vec(),
                    y: ys.to_vec(),
                    z: z.exact_chunks(grid_size).into_iter().map(|r| r.to_vec()).collect(),
                })
            }
            _ => None,
        };

        Ok(Self {
            feature_names: feature_names.to_vec(),
            target_name: target_name.to_string(),
            formula: Formula::from_model(model).render(feature_names, target_name),
            train_points: points(&data.x_train, &data.y_train),
            test_points: points(&data.x_test, &data.y_test),
            lines,
            surface,
        })
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(self).context("encoding chart data")?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Chart data saved as {}", path.display());
        Ok(())
    }
}

/// Feature values followed by the target, one entry per row.
fn points(x: &Array2<f64>, y: &Array1<f64>) -> Vec<Vec<f64>> {
    x.rows()
        .into_iter()
        .zip(y.iter())
        .map(|(row, &t)| row.iter().copied().chain(std::iter::once(t)).collect())
        .collect()
}
