//! Trade rows and the table that holds them.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::timestamp::parse_timestamp;
use super::{
    LOOKBACK_COLUMN, MARKET_COLUMN, PROFIT_COLUMN, TIMESTAMP_COLUMN, TableError,
};

/// One backtested trade.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    /// Market identifier.
    pub market: String,
    /// Lookback period in quarters.
    pub lookback_period: u32,
    /// Trade timestamp.
    pub limit_created: NaiveDateTime,
    /// Percent return; `None` when the cell was empty or unreadable.
    pub profit_percent: Option<f64>,
}

impl TradeRecord {
    /// Create a new trade record.
    #[must_use]
    pub fn new(
        market: impl Into<String>,
        lookback_period: u32,
        limit_created: NaiveDateTime,
        profit_percent: Option<f64>,
    ) -> Self {
        Self {
            market: market.into(),
            lookback_period,
            limit_created,
            profit_percent,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTradeRow {
    #[serde(rename = "Market")]
    market: String,
    #[serde(rename = "IS_QuarterCount")]
    lookback_period: String,
    #[serde(rename = "LimitCreated")]
    limit_created: String,
    #[serde(rename = "ProfitPercent", default, deserialize_with = "csv::invalid_option")]
    profit_percent: Option<f64>,
}

/// An immutable table of trades, in file order.
#[derive(Debug, Clone, Default)]
pub struct TradeTable {
    source_name: String,
    records: Vec<TradeRecord>,
}

impl TradeTable {
    /// Build a table from already parsed records.
    #[must_use]
    pub fn from_records(source_name: impl Into<String>, records: Vec<TradeRecord>) -> Self {
        Self {
            source_name: source_name.into(),
            records,
        }
    }

    /// Read a table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let reader = csv_builder()
            .from_path(path)
            .map_err(|source| TableError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        read_rows(reader, &path.display().to_string())
    }

    /// Read a table from any CSV source.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, TableError> {
        read_rows(csv_builder().from_reader(reader), source_name)
    }

    /// Name of the file or source the table was read from.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct markets in first-seen order.
    #[must_use]
    pub fn markets(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.market.as_str())
            .filter(|market| seen.insert(*market))
            .collect()
    }

    /// Distinct lookback periods across the whole table, first-seen order.
    #[must_use]
    pub fn lookback_periods(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.lookback_period)
            .filter(|period| seen.insert(*period))
            .collect()
    }

    /// Records for one `(market, lookback_period)` pair, in file order.
    pub fn slice<'a>(
        &'a self,
        market: &'a str,
        lookback_period: u32,
    ) -> impl Iterator<Item = &'a TradeRecord> + 'a {
        self.records.iter().filter(move |record| {
            record.lookback_period == lookback_period && record.market == market
        })
    }

    /// Copy of the table with every `ProfitPercent` multiplied by `risk`.
    #[must_use]
    pub fn scaled(&self, risk: f64) -> Self {
        let records = self
            .records
            .iter()
            .map(|record| TradeRecord {
                profit_percent: record.profit_percent.map(|profit| profit * risk),
                ..record.clone()
            })
            .collect();

        Self {
            source_name: self.source_name.clone(),
            records,
        }
    }
}

fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).flexible(true);
    builder
}

fn read_rows<R: Read>(
    mut reader: csv::Reader<R>,
    source_name: &str,
) -> Result<TradeTable, TableError> {
    let parse_error = |source| TableError::Parse {
        source_name: source_name.to_string(),
        source,
    };

    let headers = reader.headers().map_err(parse_error)?.clone();
    for column in [MARKET_COLUMN, LOOKBACK_COLUMN, TIMESTAMP_COLUMN, PROFIT_COLUMN] {
        if !headers.iter().any(|header| header == column) {
            return Err(TableError::MissingColumn {
                source_name: source_name.to_string(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RawTradeRow>().enumerate() {
        let row = row.map_err(parse_error)?;
        let row_number = index + 1;

        let lookback_period =
            parse_lookback(&row.lookback_period).ok_or_else(|| TableError::InvalidLookback {
                source_name: source_name.to_string(),
                row: row_number,
                value: row.lookback_period.clone(),
            })?;

        let limit_created =
            parse_timestamp(&row.limit_created).ok_or_else(|| TableError::InvalidTimestamp {
                source_name: source_name.to_string(),
                row: row_number,
                value: row.limit_created.clone(),
            })?;

        records.push(TradeRecord {
            market: row.market,
            lookback_period,
            limit_created,
            profit_percent: row.profit_percent.filter(|profit| profit.is_finite()),
        });
    }

    Ok(TradeTable::from_records(source_name, records))
}

/// Accepts `8` and `8.0`; backtest exports often write integers as floats.
pub(crate) fn parse_lookback(value: &str) -> Option<u32> {
    let parsed: f64 = value.trim().parse().ok()?;
    if !parsed.is_finite()
        || parsed < 0.0
        || parsed.fract() != 0.0
        || parsed > f64::from(u32::MAX)
    {
        return None;
    }
    Some(parsed as u32)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const SAMPLE: &str = "\
Market,IS_QuarterCount,LimitCreated,ProfitPercent,Strategy
EURUSD,4,2024-01-02 09:00:00,1.5,trend
EURUSD,8,2024-01-02 09:00:00,-0.5,trend
GBPUSD,4,2024-01-03 10:00:00,,trend
EURUSD,4,2024-01-04 09:00:00,2.0,trend
GBPUSD,12.0,2024-01-05 10:00:00,0.25,trend
";

    fn sample() -> TradeTable {
        match TradeTable::from_reader(SAMPLE.as_bytes(), "sample") {
            Ok(table) => table,
            Err(e) => panic!("sample should parse: {e}"),
        }
    }

    #[test]
    fn test_reads_rows_in_file_order() {
        let table = sample();
        assert_eq!(table.len(), 5);
        assert_eq!(table.records()[0].market, "EURUSD");
        assert_eq!(table.records()[0].profit_percent, Some(1.5));
        assert_eq!(table.records()[2].profit_percent, None);
        assert_eq!(table.records()[4].lookback_period, 12);
    }

    #[test]
    fn test_markets_and_periods_first_seen() {
        let table = sample();
        assert_eq!(table.markets(), vec!["EURUSD", "GBPUSD"]);
        assert_eq!(table.lookback_periods(), vec![4, 8, 12]);
    }

    #[test]
    fn test_slice_filters_market_and_period() {
        let table = sample();
        let slice: Vec<_> = table.slice("EURUSD", 4).collect();
        assert_eq!(slice.len(), 2);
        assert!(slice.iter().all(|r| r.market == "EURUSD" && r.lookback_period == 4));
        assert_eq!(table.slice("USDJPY", 4).count(), 0);
    }

    #[test]
    fn test_scaled_multiplies_profit() {
        let table = sample().scaled(2.0);
        assert_eq!(table.records()[0].profit_percent, Some(3.0));
        assert_eq!(table.records()[1].profit_percent, Some(-1.0));
        assert_eq!(table.records()[2].profit_percent, None);
        assert_eq!(table.source_name(), "sample");
    }

    #[test]
    fn test_unreadable_profit_is_missing() {
        let csv = "Market,IS_QuarterCount,LimitCreated,ProfitPercent\nEURUSD,4,2024-01-02,n/a\n";
        let Ok(table) = TradeTable::from_reader(csv.as_bytes(), "profit") else {
            panic!("unreadable profit should not fail the table");
        };
        assert_eq!(table.records()[0].profit_percent, None);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Market,IS_QuarterCount,ProfitPercent\nEURUSD,4,1.0\n";
        let Err(err) = TradeTable::from_reader(csv.as_bytes(), "broken") else {
            panic!("expected missing column error");
        };
        assert!(matches!(
            err,
            TableError::MissingColumn { column: "LimitCreated", .. }
        ));
    }

    #[test]
    fn test_invalid_timestamp_reports_row() {
        let csv = "Market,IS_QuarterCount,LimitCreated,ProfitPercent\n\
                   EURUSD,4,2024-01-02,1.0\n\
                   EURUSD,4,not-a-date,1.0\n";
        let Err(err) = TradeTable::from_reader(csv.as_bytes(), "dates") else {
            panic!("expected invalid timestamp error");
        };
        match err {
            TableError::InvalidTimestamp { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test_case("4", Some(4) ; "integer")]
    #[test_case("8.0", Some(8) ; "float integer")]
    #[test_case("4.5", None ; "fractional")]
    #[test_case("-1", None ; "negative")]
    #[test_case("four", None ; "text")]
    fn test_parse_lookback(raw: &str, expected: Option<u32>) {
        assert_eq!(parse_lookback(raw), expected);
    }

    #[test]
    fn test_missing_file() {
        let result = TradeTable::from_path(Path::new("/nonexistent/lookback/is_data.csv"));
        assert!(matches!(result, Err(TableError::Open { .. })));
    }
}
