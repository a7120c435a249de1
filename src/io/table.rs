use std::fs::File;
use std::io::{
    BufWriter,
    Read,
    Write,
};
use std::path::Path;

use anyhow::Context;
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::compression::open_maybe_gz;
use crate::data_structs::CandidatePattern;

/// Delimited text layout for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Tsv,
    Csv,
}

impl TableFormat {
    pub fn delimiter(&self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            TableFormat::Csv => b',',
        }
    }

    /// Guesses the format from the file name: `.csv` (optionally gzipped) is
    /// comma separated, anything else tab separated.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let name = path
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".csv") {
            TableFormat::Csv
        }
        else {
            TableFormat::Tsv
        }
    }
}

/// Writes records as a delimited table with a header row taken from the
/// serialized field names. Empty `Option` fields become empty cells.
pub fn write_table_to<T, W>(
    rows: &[T],
    writer: W,
    format: TableFormat,
) -> anyhow::Result<()>
where
    T: Serialize,
    W: Write, {
    let mut csv_writer = csv::WriterBuilder::default()
        .delimiter(format.delimiter())
        .has_headers(true)
        .from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .context("Failed to write table row")?;
    }
    csv_writer.flush().context("Failed to flush table")?;
    Ok(())
}

pub fn write_table<T, P>(
    rows: &[T],
    path: P,
    format: TableFormat,
) -> anyhow::Result<()>
where
    T: Serialize,
    P: AsRef<Path>, {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_table_to(rows, BufWriter::new(file), format)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_table_from<T, R>(
    reader: R,
    format: TableFormat,
) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read, {
    let mut csv_reader = csv::ReaderBuilder::default()
        .delimiter(format.delimiter())
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let rows = csv_reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, row)| row.with_context(|| format!("Failed to parse row {}", idx + 1)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Reads a plain or gzipped delimited table into typed records.
pub fn read_table<T, P>(
    path: P,
    format: TableFormat,
) -> anyhow::Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>, {
    let path = path.as_ref();
    let rows = read_table_from(open_maybe_gz(path)?, format)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads candidate patterns (`CpG_Coordinates`, `pattern`,
/// `fraction_Tissue1`, `fraction_Tissue2`). The delimiter follows the file
/// extension.
pub fn read_candidates<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<CandidatePattern>> {
    let format = TableFormat::from_path(&path);
    read_table(path, format)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Deserialize;

    use super::*;
    use crate::data_structs::{
        CoverageThreshold,
        PmpPattern,
    };

    #[rstest]
    #[case("candidates.csv", TableFormat::Csv)]
    #[case("candidates.CSV.gz", TableFormat::Csv)]
    #[case("candidates.tsv", TableFormat::Tsv)]
    #[case("candidates.txt", TableFormat::Tsv)]
    fn test_format_from_path(
        #[case] path: &str,
        #[case] expected: TableFormat,
    ) {
        assert_eq!(TableFormat::from_path(path), expected);
    }

    #[test]
    fn test_missing_threshold_is_empty_field() -> anyhow::Result<()> {
        let rows = vec![
            CoverageThreshold {
                cpg_coordinates:      "10:20:30".to_string(),
                pattern:              PmpPattern::P011,
                fraction_t1:          0.001,
                fraction_t2:          0.05,
                coverage_tissue1:     1_000_000,
                coverage_required_t2: Some(110),
            },
            CoverageThreshold {
                cpg_coordinates:      "40:50:60".to_string(),
                pattern:              PmpPattern::P111,
                fraction_t1:          0.0,
                fraction_t2:          0.0,
                coverage_tissue1:     1_000_000,
                coverage_required_t2: None,
            },
        ];
        let mut buf = Vec::new();
        write_table_to(&rows, &mut buf, TableFormat::Tsv)?;
        let text = String::from_utf8(buf)?;
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(
            lines[0],
            "CpG_Coordinates\tpattern\tfraction_T1\tfraction_T2\tcoverage_Tissue1\tcoverage_required_T2"
        );
        assert_eq!(lines[1], "10:20:30\t011\t0.001\t0.05\t1000000\t110");
        assert_eq!(lines[2], "40:50:60\t111\t0.0\t0.0\t1000000\t");

        let parsed: Vec<CoverageThreshold> =
            read_table_from(text.as_bytes(), TableFormat::Tsv)?;
        assert_eq!(parsed, rows);
        Ok(())
    }

    #[test]
    fn test_read_candidates_accepts_short_names() -> anyhow::Result<()> {
        let text = "CpG_Coordinates,pattern,fraction_T1,fraction_T2\n1:2:3,`010,0.0,0.25\n";
        let rows: Vec<CandidatePattern> = read_table_from(text.as_bytes(), TableFormat::Csv)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pattern, PmpPattern::P010);
        assert_eq!(rows[0].fraction_tissue2, 0.25);
        Ok(())
    }

    #[test]
    fn test_read_table_reports_bad_row() {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[allow(dead_code)]
            value: u32,
        }
        let text = "value\n1\nnot-a-number\n";
        let err = read_table_from::<Row, _>(text.as_bytes(), TableFormat::Tsv).unwrap_err();
        assert!(format!("{:#}", err).contains("row 2"));
    }
}
