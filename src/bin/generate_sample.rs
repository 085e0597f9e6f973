//! Writes a synthetic housing table for trying the pipeline out.
//!
//! Prices follow `50 + 0.12 * sqft + 8 * bedrooms` plus Gaussian noise. A few
//! rows are deliberately blank, non-numeric or far out of range so the cleaning
//! stage has something to do.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Parser)]
#[command(about = "Generate a synthetic housing CSV")]
struct Args {
    /// Output path
    #[arg(short, long, default_value = "house_data.csv")]
    output: PathBuf,

    /// Number of well-formed rows
    #[arg(short, long, default_value_t = 200)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let written = write_sample(file, args.rows, args.seed)?;

    log::info!(
        "Wrote {written} rows ({} malformed) to {}",
        MALFORMED.len(),
        args.output.display()
    );
    Ok(())
}

/// Rows the cleaner should drop.
const MALFORMED: [[&str; 3]; 5] = [
    ["", "3", "310.0"],
    ["1650", "three", "295.0"],
    ["1400", "2", "n/a"],
    ["25000", "4", "320.0"],
    ["1900", "3", "9999.0"],
];

/// Write the header, `rows` generated houses and the malformed rows.
/// Returns the number of data rows written.
fn write_sample<W: std::io::Write>(out: W, rows: usize, seed: u64) -> Result<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let sqft_dist = Normal::<f64>::new(1800.0, 450.0).context("square footage distribution")?;
    let noise = Normal::<f64>::new(0.0, 15.0).context("price noise distribution")?;

    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["square_footage", "bedrooms", "price_thousands"])?;

    for _ in 0..rows {
        let sqft: f64 = sqft_dist.sample(&mut rng).clamp(500.0, 4500.0).round();
        let bedrooms = (sqft / 600.0).round().clamp(1.0, 6.0) + f64::from(rng.gen_range(-1i8..=1));
        let bedrooms = bedrooms.max(1.0);
        let price: f64 = 50.0 + 0.12 * sqft + 8.0 * bedrooms + noise.sample(&mut rng);
        writer.write_record([
            format!("{sqft}"),
            format!("{bedrooms}"),
            format!("{price:.1}"),
        ])?;
    }
    for record in MALFORMED {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(rows + MALFORMED.len())
}
