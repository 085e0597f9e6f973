//! Model layer: standardization, least-squares fit, evaluation and the
//! de-scaled formula.

pub mod evaluate;
pub mod formula;
pub mod linear;
pub mod metrics;
pub mod scaler;

pub use evaluate::{evaluate, evaluate_split, Evaluation, ModelResults};
pub use formula::Formula;
pub use linear::{FittedModel, LinearModel};
pub use scaler::StandardScaler;
