//! Parameters extract for the selected lookback periods.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use super::trades::parse_lookback;
use super::{LOOKBACK_COLUMN, MARKET_COLUMN, TableError};

/// Copy the rows of a parameters table whose `(Market, IS_QuarterCount)`
/// matches the selection, keeping the original header and column order.
///
/// Returns the number of data rows written.
pub fn extract_selected_parameters(
    source: &Path,
    destination: &Path,
    selection: &BTreeMap<String, u32>,
) -> Result<usize, TableError> {
    let source_name = source.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(source)
        .map_err(|source_err| TableError::Open {
            path: source.to_path_buf(),
            source: source_err,
        })?;

    let parse_error = |source_err| TableError::Parse {
        source_name: source_name.clone(),
        source: source_err,
    };
    let write_error = |source_err| TableError::Write {
        path: destination.to_path_buf(),
        source: source_err,
    };

    let headers = reader.headers().map_err(parse_error)?.clone();
    let market_index = column_index(&headers, MARKET_COLUMN, &source_name)?;
    let lookback_index = column_index(&headers, LOOKBACK_COLUMN, &source_name)?;

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(destination)
        .map_err(write_error)?;
    writer.write_record(&headers).map_err(write_error)?;

    let mut written = 0;
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        let market = record.get(market_index).map(str::trim);
        let period = record.get(lookback_index).and_then(parse_lookback);

        let selected = match (market, period) {
            (Some(market), Some(period)) => selection.get(market) == Some(&period),
            _ => false,
        };
        if selected {
            let mut record = record;
            // Short rows get empty trailing fields
            while record.len() < headers.len() {
                record.push_field("");
            }
            writer.write_record(&record).map_err(write_error)?;
            written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| write_error(csv::Error::from(e)))?;

    info!(
        source = %source.display(),
        destination = %destination.display(),
        rows = written,
        "Wrote selected parameters"
    );

    Ok(written)
}

fn column_index(
    headers: &csv::StringRecord,
    column: &'static str,
    source_name: &str,
) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| TableError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMETERS: &str = "\
Market,IS_QuarterCount,FastMA,SlowMA
EURUSD,4,10,40
EURUSD,8,12,48
GBPUSD,4,9,36
USDJPY,8.0,11,44
";

    #[test]
    fn test_extract_keeps_selected_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("parameters.csv");
        let destination = dir.path().join("selected_parameters.csv");
        std::fs::write(&source, PARAMETERS).unwrap();

        let selection = BTreeMap::from([
            ("EURUSD".to_string(), 8),
            ("USDJPY".to_string(), 8),
        ]);

        let written = extract_selected_parameters(&source, &destination, &selection).unwrap();
        assert_eq!(written, 2);

        let output = std::fs::read_to_string(&destination).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Market,IS_QuarterCount,FastMA,SlowMA",
                "EURUSD,8,12,48",
                "USDJPY,8.0,11,44",
            ]
        );
    }

    #[test]
    fn test_extract_pads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("parameters.csv");
        let destination = dir.path().join("selected_parameters.csv");
        std::fs::write(&source, "Market,IS_QuarterCount,FastMA,SlowMA\nEURUSD,4,10\n").unwrap();

        let selection = BTreeMap::from([("EURUSD".to_string(), 4)]);
        let written = extract_selected_parameters(&source, &destination, &selection).unwrap();
        assert_eq!(written, 1);

        let output = std::fs::read_to_string(&destination).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["Market,IS_QuarterCount,FastMA,SlowMA", "EURUSD,4,10,"]);
    }

    #[test]
    fn test_extract_empty_selection_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("parameters.csv");
        let destination = dir.path().join("selected_parameters.csv");
        std::fs::write(&source, PARAMETERS).unwrap();

        let written = extract_selected_parameters(&source, &destination, &BTreeMap::new()).unwrap();
        assert_eq!(written, 0);

        let output = std::fs::read_to_string(&destination).unwrap();
        assert_eq!(output.trim_end(), "Market,IS_QuarterCount,FastMA,SlowMA");
    }

    #[test]
    fn test_extract_requires_lookback_column() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("parameters.csv");
        std::fs::write(&source, "Market,FastMA\nEURUSD,10\n").unwrap();

        let result = extract_selected_parameters(
            &source,
            &dir.path().join("out.csv"),
            &BTreeMap::new(),
        );
        assert!(matches!(
            result,
            Err(TableError::MissingColumn { column: "IS_QuarterCount", .. })
        ));
    }
}
