use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use housing_regression::chart::ChartData;
use housing_regression::cli::{Cli, Mode};
use housing_regression::config::PipelineConfig;
use housing_regression::error::{DataError, Error, ModelError, EXIT_UNCLASSIFIED};
use housing_regression::regression::FittedModel;
use housing_regression::{persist, pipeline, predict, report};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config().context("invalid configuration")?;
    let input = cli.input_path(&config);

    match cli.mode() {
        Mode::PredictOnly => {
            let loaded =
                pipeline::load_model(cli.model_path(&config), cli.metadata_path(&config), &config)?;
            let table = pipeline::load_clean(input, &config)?;
            let predictions =
                predict::make_predictions(&table, &config.feature_columns, &loaded.model)?;
            let x = table.features(&config.feature_columns).map_err(|columns| {
                Error::from(DataError::MissingColumns { columns })
            })?;
            report::print_predictions(
                x.view(),
                predictions.view(),
                &config.feature_columns,
                &config.target_column,
                config.sample_rows,
            );
            predict_single(cli, &config, &loaded.model)?;
        }
        Mode::Evaluate => {
            let loaded =
                pipeline::load_model(cli.model_path(&config), cli.metadata_path(&config), &config)?;
            report::print_metadata(&loaded.metadata);
            let table = pipeline::load_clean(input, &config)?;
            let run = pipeline::evaluate_loaded(&table, loaded.model, &config)?;
            println!("Test R2: {:.4}", run.results.test.r2);
            predict_single(cli, &config, &run.results.model)?;
        }
        Mode::Train { save } => {
            let table = pipeline::load_clean(input, &config)?;
            let run = pipeline::train(&table, &config)?;
            report::print_results(
                &run.split,
                &run.results,
                &config.feature_columns,
                &config.target_column,
                config.sample_rows,
            );

            if !cli.no_plot {
                let chart = ChartData::build(
                    &run.split,
                    &run.results.model,
                    &config.feature_columns,
                    &config.target_column,
                    config.line_points,
                    config.mesh_grid_size,
                )?;
                chart.write_json(&config.chart_path)?;
            }

            if save {
                persist::save_model(
                    &run.results,
                    &config.feature_columns,
                    &config.target_column,
                    cli.model_path(&config),
                    cli.metadata_path(&config),
                )?;
            }
            predict_single(cli, &config, &run.results.model)?;
        }
    }
    Ok(())
}

/// Handle `--predict name=value,...` when given.
fn predict_single(cli: &Cli, config: &PipelineConfig, model: &FittedModel) -> anyhow::Result<()> {
    let Some(input) = cli.predict.as_deref() else {
        return Ok(());
    };
    let row = predict::parse_prediction_input(input, &config.feature_columns)?;
    let value = predict::predict_one(model, &row)?;
    println!("\nPredicted {}: {value:.2}", config.target_column);
    Ok(())
}

/// Walk the error chain for the first categorised failure.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<Error>() {
            return e.exit_code();
        }
        if cause.is::<DataError>() {
            return 1;
        }
        if cause.is::<ModelError>() {
            return 2;
        }
    }
    EXIT_UNCLASSIFIED
}
