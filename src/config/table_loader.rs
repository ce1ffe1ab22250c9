//! Schedule table loading from CSV.
//!
//! Tables have exactly three required columns, `household_type`, `income` and
//! `amount`, with one row per sample point. Extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculation::{SamplePoint, ScheduleTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditWarning, HouseholdType};

/// The columns every schedule table must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["household_type", "income", "amount"];

/// How malformed rows are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableParseMode {
    /// Reject the whole table on the first malformed row.
    #[default]
    Strict,
    /// Skip malformed rows and report them.
    Lenient,
}

/// A row dropped while loading in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// The 1-based line number in the source, counting the header.
    pub line: u64,
    /// Why the row was rejected.
    pub reason: String,
}

/// A loaded schedule table plus any rows skipped on the way.
#[derive(Debug, Clone)]
pub struct TableLoadReport {
    /// The usable sample points.
    pub table: ScheduleTable,
    /// Rows dropped in lenient mode; always empty in strict mode.
    pub skipped: Vec<SkippedRow>,
}

impl TableLoadReport {
    /// Returns one `TABLE_ROW_SKIPPED` audit warning per skipped row.
    pub fn warnings(&self) -> Vec<AuditWarning> {
        self.skipped
            .iter()
            .map(|row| AuditWarning {
                code: "TABLE_ROW_SKIPPED".to_string(),
                message: format!("Schedule table line {} skipped: {}", row.line, row.reason),
                severity: "medium".to_string(),
            })
            .collect()
    }
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<i64, String> {
    let value = value.unwrap_or("").trim();
    let parsed: i64 = value
        .replace(',', "")
        .parse()
        .map_err(|_| format!("{} '{}' is not a whole number", field, value))?;
    if parsed < 0 {
        return Err(format!("{} {} must not be negative", field, parsed));
    }
    Ok(parsed)
}

fn parse_row(record: &csv::StringRecord, columns: &[usize; 3]) -> Result<SamplePoint, String> {
    let household_label = record.get(columns[0]).unwrap_or("");
    let household_type: HouseholdType = household_label
        .parse()
        .map_err(|e: EngineError| e.to_string())?;
    let income = parse_amount("income", record.get(columns[1]))?;
    let amount = parse_amount("amount", record.get(columns[2]))?;
    Ok(SamplePoint {
        household_type,
        income,
        amount,
    })
}

/// Returns the physical line a record starts on.
///
/// The reader stamps each record with the position reached after the previous
/// one, before any blank lines are skipped, so those line breaks are added here.
fn record_line(data: &[u8], position: &csv::Position) -> u64 {
    let start = usize::try_from(position.byte())
        .unwrap_or(data.len())
        .min(data.len());
    let blank_lines = data[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count() as u64;
    position.line() + blank_lines
}

/// Loads a schedule table from any CSV reader.
///
/// # Errors
///
/// Returns `InvalidScheduleTable` if the input cannot be read, if a required
/// column is missing, if a row is malformed in strict mode, or if no usable
/// rows remain.
///
/// # Example
///
/// ```
/// use eitc_engine::config::{TableParseMode, load_schedule_table};
///
/// let csv = "household_type,income,amount\n단독,4000000,0\n단독,9000000,1650000\n";
/// let report = load_schedule_table(csv.as_bytes(), TableParseMode::Strict)?;
/// assert_eq!(report.table.points().len(), 2);
/// # Ok::<(), eitc_engine::error::EngineError>(())
/// ```
pub fn load_schedule_table<R: Read>(
    mut reader: R,
    mode: TableParseMode,
) -> EngineResult<TableLoadReport> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| EngineError::InvalidScheduleTable {
            message: format!("could not read table: {}", e),
        })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data.as_slice());

    let headers = csv_reader
        .headers()
        .map_err(|e| EngineError::InvalidScheduleTable {
            message: format!("could not read header row: {}", e),
        })?
        .clone();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
    };
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| position(name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::InvalidScheduleTable {
            message: format!("missing required columns: {}", missing.join(", ")),
        });
    }
    let columns = [
        position("household_type").unwrap_or_default(),
        position("income").unwrap_or_default(),
        position("amount").unwrap_or_default(),
    ];

    let mut points = Vec::new();
    let mut skipped = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        // Header is line 1.
        let fallback_line = index as u64 + 2;
        let (line, parsed) = match record {
            Ok(record) => (
                record
                    .position()
                    .map_or(fallback_line, |p| record_line(&data, p)),
                parse_row(&record, &columns),
            ),
            Err(e) => (
                e.position()
                    .map_or(fallback_line, |p| record_line(&data, p)),
                Err(e.to_string()),
            ),
        };

        match parsed {
            Ok(point) => points.push(point),
            Err(reason) => match mode {
                TableParseMode::Strict => {
                    return Err(EngineError::InvalidScheduleTable {
                        message: format!("line {}: {}", line, reason),
                    });
                }
                TableParseMode::Lenient => {
                    warn!(line, reason = %reason, "Skipping malformed table row");
                    skipped.push(SkippedRow { line, reason });
                }
            },
        }
    }

    let table = ScheduleTable::new(points).map_err(|_| EngineError::InvalidScheduleTable {
        message: "table contains no usable rows".to_string(),
    })?;

    Ok(TableLoadReport { table, skipped })
}

/// Loads a schedule table from a CSV file.
pub fn load_schedule_table_file<P: AsRef<Path>>(
    path: P,
    mode: TableParseMode,
) -> EngineResult<TableLoadReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|_| EngineError::ConfigNotFound {
        path: path.display().to_string(),
    })?;
    load_schedule_table(file, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::interpolate;

    const VALID_TABLE: &str = "\
household_type,income,amount
단독,0,0
단독,4000000,100000
단독,9000000,1650000
단독,22000000,0
맞벌이,8000000,120000
맞벌이,17000000,3300000
맞벌이,44000000,0
";

    #[test]
    fn test_load_valid_table() {
        let report = load_schedule_table(VALID_TABLE.as_bytes(), TableParseMode::Strict).unwrap();

        assert_eq!(report.table.points().len(), 7);
        assert!(report.skipped.is_empty());
        assert_eq!(
            interpolate(9_000_000, HouseholdType::Single, &report.table),
            1_650_000
        );
        assert_eq!(
            interpolate(17_000_000, HouseholdType::DualEarner, &report.table),
            3_300_000
        );
    }

    #[test]
    fn test_missing_columns_are_named() {
        let csv = "household_type,salary,amount\nsingle,1,1\n";
        match load_schedule_table(csv.as_bytes(), TableParseMode::Lenient) {
            Err(EngineError::InvalidScheduleTable { message }) => {
                assert_eq!(message, "missing required columns: income");
            }
            other => panic!("Expected InvalidScheduleTable, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_and_reordering_are_accepted() {
        let csv = "note,amount,income,household_type\nx,500,10,single\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Strict).unwrap();
        let point = report.table.points()[0];
        assert_eq!(point.income, 10);
        assert_eq!(point.amount, 500);
    }

    #[test]
    fn test_strict_mode_rejects_malformed_row() {
        let csv = "household_type,income,amount\nsingle,100,10\nsingle,abc,20\n";
        match load_schedule_table(csv.as_bytes(), TableParseMode::Strict) {
            Err(EngineError::InvalidScheduleTable { message }) => {
                assert!(message.contains("line 3"), "message was {}", message);
                assert!(message.contains("abc"));
            }
            other => panic!("Expected InvalidScheduleTable, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_rejects_unknown_household() {
        let csv = "household_type,income,amount\nquadruple,100,10\n";
        let result = load_schedule_table(csv.as_bytes(), TableParseMode::Strict);
        assert!(matches!(
            result,
            Err(EngineError::InvalidScheduleTable { .. })
        ));
    }

    #[test]
    fn test_lenient_mode_skips_and_reports() {
        let csv = "household_type,income,amount\nsingle,100,10\nsingle,-5,20\nsingle,300,30\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Lenient).unwrap();

        assert_eq!(report.table.points().len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert!(report.skipped[0].reason.contains("must not be negative"));

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "TABLE_ROW_SKIPPED");
        assert_eq!(
            warnings[0].message,
            "Schedule table line 3 skipped: income -5 must not be negative"
        );
    }

    #[test]
    fn test_skipped_line_counts_blank_lines() {
        let csv = "household_type,income,amount\nsingle,0,0\n\nsingle,oops,1\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Lenient).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 4);
        assert_eq!(report.skipped[0].reason, "income 'oops' is not a whole number");
        assert_eq!(
            report.warnings()[0].message,
            "Schedule table line 4 skipped: income 'oops' is not a whole number"
        );

        match load_schedule_table(csv.as_bytes(), TableParseMode::Strict) {
            Err(EngineError::InvalidScheduleTable { message }) => {
                assert_eq!(message, "line 4: income 'oops' is not a whole number");
            }
            other => panic!("Expected InvalidScheduleTable, got {:?}", other),
        }
    }

    #[test]
    fn test_crlf_line_endings_keep_line_numbers() {
        let csv = "household_type,income,amount\r\nsingle,0,0\r\n\r\n\r\nsingle,1,x\r\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Lenient).unwrap();
        assert_eq!(report.skipped[0].line, 5);
    }

    #[test]
    fn test_table_without_usable_rows_is_rejected() {
        let csv = "household_type,income,amount\nsingle,x,y\n";
        let result = load_schedule_table(csv.as_bytes(), TableParseMode::Lenient);
        match result {
            Err(EngineError::InvalidScheduleTable { message }) => {
                assert!(message.contains("no usable rows"));
            }
            other => panic!("Expected InvalidScheduleTable, got {:?}", other),
        }
    }

    #[test]
    fn test_thousands_separators_are_accepted() {
        let csv = "household_type,income,amount\nsingle,\"4,000,000\",\"100,000\"\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Strict).unwrap();
        assert_eq!(report.table.points()[0].income, 4_000_000);
        assert_eq!(report.table.points()[0].amount, 100_000);
    }

    #[test]
    fn test_byte_order_mark_header_is_accepted() {
        let csv = "\u{feff}household_type,income,amount\nsingle,1,1\n";
        let report = load_schedule_table(csv.as_bytes(), TableParseMode::Strict).unwrap();
        assert_eq!(report.table.points().len(), 1);
    }

    #[test]
    fn test_missing_file_returns_config_not_found() {
        let result = load_schedule_table_file("/nonexistent/table.csv", TableParseMode::Strict);
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }
}
