//! JSON persistence with a 4-space indent.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::port::RenderError;

/// Write `value` as pretty JSON indented with four spaces.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), RenderError> {
    let io_error = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_json_to(&mut writer, value)?;
    writer.flush().map_err(io_error)
}

/// Serialize `value` as pretty JSON indented with four spaces into `writer`.
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: W,
    value: &T,
) -> Result<(), RenderError> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| RenderError::Serialization {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_four_space_indent() {
        let value = BTreeMap::from([("EURUSD", BTreeMap::from([("lookback_period", 4)]))]);
        let mut buffer = Vec::new();
        write_json_to(&mut buffer, &value).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "{\n    \"EURUSD\": {\n        \"lookback_period\": 4\n    }\n}"
        );
    }

    #[test]
    fn test_write_json_pretty_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("best_periods.json");

        write_json_pretty(&path, &BTreeMap::from([("a", 1)])).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_unwritable_path() {
        let result = write_json_pretty(Path::new("/nonexistent/dir/out.json"), &1);
        assert!(matches!(result, Err(RenderError::Io { .. })));
    }
}
