use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("Hierarchy parse error: {0}")]
    Parse(String),

    #[error("No active selection")]
    NoActiveSelection,

    #[error("No image loaded")]
    NoImage,

    #[error("No hierarchy dump loaded")]
    NoHierarchy,

    #[error("No history entry with id {0}")]
    HistoryEntryNotFound(String),

    #[error("Sample out of bounds at ({x}, {y})")]
    SampleOutOfBounds { x: i64, y: i64 },

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl serde::Serialize for InspectorError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type InspectorResult<T> = Result<T, InspectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = InspectorError::SampleOutOfBounds { x: -1, y: 4 };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Sample out of bounds at (-1, 4)\"");
    }
}
