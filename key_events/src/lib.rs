//! # Key Events
//!
//! Explain website key events with traffic metrics and simulate "what if"
//! changes to those metrics.
//!
//! ## Features
//!
//! - CSV loading with header trimming and required-column validation
//! - Ordinary least squares fit of `Key events` on `Total users`, `New users`,
//!   `Sessions` and `Bounce rate`, with an optional held-out split
//! - Scenario simulation: the predicted change in key events when one metric
//!   moves by a fixed amount per day over a week, month or quarter
//! - Strongest positive and negative driver narration
//! - JSON model persistence for a fit-once, predict-later workflow
//!
//! ## Quick Start
//!
//! ```no_run
//! use key_events::{Config, Session};
//!
//! let mut session = Session::new(Config::default())?;
//! session.upload_csv("ga4_export.csv")?;
//!
//! let impact = session.scenario("Sessions", 10.0, Some("week"))?;
//! println!("{}", impact);
//!
//! for line in session.insights()?.narrate() {
//!     println!("{}", line);
//! }
//! # Ok::<(), key_events::ImpactError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod insight;
pub mod metrics;
pub mod model;
pub mod scenario;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{Config, Lifecycle};
pub use crate::data::{validate_columns, Dataset, FeatureSet, Table, REQUIRED_COLUMNS};
pub use crate::error::{ImpactError, Result};
pub use crate::features::{Feature, FeatureRow};
pub use crate::insight::{strongest_drivers, Drivers};
pub use crate::metrics::RegressionMetrics;
pub use crate::model::{FitSummary, FittedModel, HeldOutPrediction, LinearRegression};
pub use crate::scenario::{simulate, Direction, Horizon, Scenario, ScenarioImpact};
pub use crate::session::Session;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
