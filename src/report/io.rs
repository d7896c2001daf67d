use std::{
    fs::{self, File},
    path::Path,
};

use polars::{
    frame::DataFrame,
    prelude::{CsvWriter, JsonFormat, JsonWriter, SchemaRef, SerWriter},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{DataError, IoError, LabelTraderResult};

// ================================================================================================
// Traits
// ================================================================================================

/// Defines a common interface for all DataFrame-backed reports.
pub trait Report {
    /// Access the underlying DataFrame.
    fn as_df(&self) -> &DataFrame;
}

pub trait ReportName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        format!("{}.{}", self.base_name(), ext)
    }
}

pub trait ToSchema {
    /// Returns the canonical schema for this report type.
    fn to_schema() -> SchemaRef;
}

pub trait ToJson {
    /// Serializes the report to a generic JSON Value.
    /// Returns a `Value::Array` containing row objects.
    fn to_json(&self) -> LabelTraderResult<Value>;
}

pub trait ToCsv {
    /// Writes the report to `<dir>/<base_name>.csv` with a header row.
    ///
    /// # Side Effects
    /// - Creates the directory if missing.
    /// - Overwrites the file if it exists.
    fn to_csv(&self, dir: impl AsRef<Path>) -> LabelTraderResult<()>;
}

// ================================================================================================
// Blanket Implementations
// ================================================================================================

impl<T> ToJson for T
where
    T: Report,
{
    fn to_json(&self) -> LabelTraderResult<Value> {
        let df = self.as_df();
        if df.height() == 0 {
            return Ok(Value::Array(Vec::new()));
        }

        let mut buf = Vec::with_capacity(df.height() * df.width() * (1 << 4));
        JsonWriter::new(&mut buf)
            .with_json_format(JsonFormat::Json)
            .finish(&mut df.clone())
            .map_err(|e| DataError::DataFrame(format!("Failed to serialize report: {e}")))?;

        let value: Value = serde_json::from_slice(&buf).map_err(IoError::Json)?;
        match value {
            Value::Array(_) => Ok(value),
            _ => Err(DataError::DataFrame("Polars JSON output was not an array".to_string()).into()),
        }
    }
}

impl<T> ToCsv for T
where
    T: Report + ReportName,
{
    fn to_csv(&self, dir: impl AsRef<Path>) -> LabelTraderResult<()> {
        let dir = dir.as_ref();
        let file_path = dir.join(self.filename(FileExtension::Csv));

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                IoError::FileSystem(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        let mut file = File::create(&file_path).map_err(|e| {
            IoError::FileSystem(format!("Failed to create {}: {e}", file_path.display()))
        })?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut self.as_df().clone())
            .map_err(|e| {
                IoError::WriteFailed(format!(
                    "Failed to write CSV to '{}': {e}",
                    file_path.display()
                ))
            })?;

        tracing::debug!(path = %file_path.display(), rows = self.as_df().height(), "Report written");
        Ok(())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
    Json,
}
