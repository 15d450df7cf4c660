//! Device list loading.
//!
//! The device list is a CSV file whose first column is headed `device_id`.
//! Only that column is read; any other columns are ignored, but every row
//! must have the same number of fields as the header.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, Trim};

/// Required name of the first column.
pub const DEVICE_ID_HEADER: &str = "device_id";

/// Read device identifiers from a CSV file.
pub fn load_device_ids(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to open device list {}", path.display()))?;
    parse_device_ids(&contents).with_context(|| format!("invalid device list {}", path.display()))
}

/// Parse device identifiers from CSV text.
///
/// Blank identifiers are skipped. A list with no identifiers is an error,
/// since a service with no devices can only answer 404.
pub fn parse_device_ids(contents: &str) -> Result<Vec<String>> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| anyhow!("CSV file is empty"))?
        .context("failed to read CSV header")?;
    if header.get(0) != Some(DEVICE_ID_HEADER) {
        bail!("CSV must have '{}' column header", DEVICE_ID_HEADER);
    }

    let mut ids = Vec::new();
    for record in records {
        let record = record.context("failed to read CSV record")?;
        match record.get(0) {
            Some(id) if !id.is_empty() => ids.push(id.to_string()),
            _ => {}
        }
    }

    if ids.is_empty() {
        bail!("no device IDs found in CSV");
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_first_column() {
        let ids = parse_device_ids("device_id,location\nalpha,lab\nbeta,roof\n").unwrap();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn single_column_with_crlf() {
        let ids = parse_device_ids("device_id\r\nalpha\r\nbeta\r\n").unwrap();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn blank_ids_are_skipped() {
        let ids = parse_device_ids("device_id\nalpha\n\n  \n\"\"\nbeta").unwrap();
        assert_eq!(ids, vec!["alpha", "beta"]);

        let ids = parse_device_ids("device_id,note\nalpha,x\n,orphan\nbeta,y\n").unwrap();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }

    #[test]
    fn quoted_ids_are_unwrapped() {
        let ids = parse_device_ids("\"device_id\",\"note\"\n\"60-6b-44-84-dc-64\",\"x\"\n").unwrap();
        assert_eq!(ids, vec!["60-6b-44-84-dc-64"]);
    }

    #[test]
    fn quoted_commas_stay_in_the_id() {
        let ids = parse_device_ids("device_id,note\n\"dev,1\",x\n").unwrap();
        assert_eq!(ids, vec!["dev,1"]);
    }

    #[test]
    fn doubled_quotes_are_unescaped() {
        let ids = parse_device_ids("device_id\n\"a\"\"b\"\n").unwrap();
        assert_eq!(ids, vec!["a\"b"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(parse_device_ids("device_id,location\nalpha\n").is_err());
        assert!(parse_device_ids("device_id\nalpha,extra\n").is_err());
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let ids = parse_device_ids("\u{feff}device_id\nalpha\n").unwrap();
        assert_eq!(ids, vec!["alpha"]);
    }

    #[test]
    fn wrong_header_is_rejected() {
        let err = parse_device_ids("id\nalpha\n").unwrap_err();
        assert!(err.to_string().contains("device_id"));
    }

    #[test]
    fn header_must_be_first_column() {
        assert!(parse_device_ids("name,device_id\nx,alpha\n").is_err());
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(parse_device_ids("").is_err());
        assert!(parse_device_ids("device_id\n").is_err());
        assert!(parse_device_ids("device_id\n\n  \n").is_err());
    }

    #[test]
    fn duplicates_are_kept_for_the_store_to_collapse() {
        let ids = parse_device_ids("device_id\nalpha\nalpha\n").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_id").unwrap();
        writeln!(file, "sensor-1").unwrap();
        writeln!(file, "sensor-2").unwrap();

        let ids = load_device_ids(file.path()).unwrap();
        assert_eq!(ids, vec!["sensor-1", "sensor-2"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_device_ids(Path::new("/nonexistent/devices.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/devices.csv"));
    }
}
