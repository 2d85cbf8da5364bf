use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DatasetError;

/// One persisted unit of output: a local image path paired with its caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Relative path of the downloaded image (e.g. `./images/image_0001.jpg`)
    pub image: String,

    /// Caption text resolved for the image
    pub caption: String,
}

/// Ordered accumulator for dataset records.
///
/// Records are appended in discovery order across pages and containers and
/// serialized once at the end of the run. Duplicates across pages are possible
/// and accepted.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<DatasetRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Records are immutable once pushed.
    pub fn push(&mut self, record: DatasetRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DatasetRecord] {
        &self.records
    }

    /// Serialize the accumulated records to an indented JSON array.
    ///
    /// The output is UTF-8 with non-ASCII characters preserved unescaped, so
    /// captions in any language stay human-readable.
    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, json)?;

        ::log::info!(
            "Dataset saved to {} ({} records)",
            path.display(),
            self.records.len()
        );
        Ok(())
    }
}
