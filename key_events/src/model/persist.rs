//! Saving and loading fitted models as JSON

use crate::error::{ImpactError, Result};
use crate::model::FittedModel;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// Version written into every model file
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct ModelFileRef<'a> {
    format_version: u32,
    model: &'a FittedModel,
}

#[derive(Deserialize)]
struct ModelFile {
    format_version: u32,
    model: FittedModel,
}

impl FittedModel {
    /// Write the model to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "saved model");
        Ok(())
    }

    /// Read a model previously written by [`FittedModel::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let model = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), "loaded model");
        Ok(model)
    }

    /// Serialize the model as pretty JSON
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let file = ModelFileRef {
            format_version: MODEL_FORMAT_VERSION,
            model: self,
        };
        serde_json::to_writer_pretty(writer, &file)?;
        Ok(())
    }

    /// Deserialize and validate a model
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: ModelFile = serde_json::from_reader(reader)?;

        if file.format_version != MODEL_FORMAT_VERSION {
            return Err(ImpactError::ModelFormat(format!(
                "unsupported model format version {} (expected {})",
                file.format_version, MODEL_FORMAT_VERSION
            )));
        }

        file.model.validate()?;
        Ok(file.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Feature;

    #[test]
    fn test_in_memory_round_trip() {
        let model =
            FittedModel::from_parts(Feature::ALL.to_vec(), vec![0.1, 0.2, 0.3, -4.0], 1.5).unwrap();

        let mut buf = Vec::new();
        model.to_writer(&mut buf).unwrap();
        let restored = FittedModel::from_reader(buf.as_slice()).unwrap();

        assert_eq!(restored, model);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let json = r#"{"format_version": 99, "model": {"features": [], "coefficients": [], "intercept": 0.0}}"#;
        assert!(matches!(
            FittedModel::from_reader(json.as_bytes()),
            Err(ImpactError::ModelFormat(_))
        ));
    }

    #[test]
    fn test_rejects_incomplete_feature_list() {
        let json = r#"{
            "format_version": 1,
            "model": {"features": ["Sessions"], "coefficients": [0.1], "intercept": 0.0}
        }"#;
        assert!(matches!(
            FittedModel::from_reader(json.as_bytes()),
            Err(ImpactError::ModelFormat(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_feature_name() {
        let json = r#"{
            "format_version": 1,
            "model": {"features": ["Pageviews"], "coefficients": [0.1], "intercept": 0.0}
        }"#;
        assert!(matches!(
            FittedModel::from_reader(json.as_bytes()),
            Err(ImpactError::JsonError(_))
        ));
    }
}
