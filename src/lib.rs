//! # Key Events Workspace
//!
//! Umbrella crate for the key events impact analysis workspace. The library
//! lives in [`key_events`]; the `key-events` binary lives in `key_events_cli`.
//!
//! ## Example
//!
//! ```
//! use key_events_workspace::prelude::*;
//!
//! let model = FittedModel::from_parts(Feature::ALL.to_vec(), vec![0.02, 0.05, 0.1, -30.0], 4.0)?;
//! let baseline = FeatureRow::new([1000.0, 400.0, 1200.0, 0.5]);
//!
//! let impact = simulate(&model, &baseline, "Sessions", 10.0, "week")?;
//! assert_eq!(impact.direction(), Direction::Increase);
//! assert!((impact.delta_events - 7.0).abs() < 1e-9);
//! # Ok::<(), ImpactError>(())
//! ```

pub use key_events;

/// The types most analyses need
pub mod prelude {
    pub use key_events::{
        simulate, Config, Dataset, Direction, Feature, FeatureRow, FittedModel, Horizon, ImpactError,
        Lifecycle, LinearRegression, Session,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_reaches_library() {
        let session = Session::new(Config::default()).unwrap();
        assert_eq!(session.config().lifecycle, Lifecycle::FitOnUpload);
        assert_eq!(key_events::NAME, "key_events");
    }
}
