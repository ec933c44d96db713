//! Delimited text input/output for trace data.

use crate::error::{TraceError, TraceResult};
use rcm_core::{Real, TimeSeries};
use std::io::Write;
use std::path::Path;

/// Read a two-column (time, value) delimited text file. Columns may be
/// separated by whitespace or commas; blank lines and `#` comments are
/// skipped; extra columns are ignored. The sampling frequency is
/// inferred from the time column.
pub fn read_trace_file(path: &Path) -> TraceResult<TimeSeries> {
    let text = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut time = Vec::new();
    let mut values = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty());
        let parse = |field: Option<&str>| -> TraceResult<Real> {
            field
                .and_then(|f| f.parse::<Real>().ok())
                .ok_or_else(|| TraceError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                })
        };
        time.push(parse(fields.next())?);
        values.push(parse(fields.next())?);
    }

    Ok(TimeSeries::from_columns(time, values)?)
}

/// Write parallel columns as tab-delimited text with fixed precision.
pub fn write_columns(path: &Path, columns: &[&[Real]]) -> TraceResult<()> {
    let rows = columns.first().map_or(0, |c| c.len());
    if columns.iter().any(|c| c.len() != rows) {
        return Err(TraceError::Signal(rcm_signal::SignalError::InvalidArg {
            what: "output columns must have equal length",
        }));
    }

    let file = std::fs::File::create(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    let io_err = |source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    };
    for row in 0..rows {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                write!(writer, "\t").map_err(io_err)?;
            }
            write!(writer, "{:.9e}", column[row]).map_err(io_err)?;
        }
        writeln!(writer).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rcm-trace-test-{}-{name}", std::process::id()));
        path
    }

    #[test]
    fn reads_whitespace_and_comma_layouts() {
        let path = temp_path("mixed.txt");
        std::fs::write(&path, "# header\n0.0 1.0\n1.0e-3,1.5\n2.0e-3\t2.0\n\n").unwrap();
        let series = read_trace_file(&path).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[1.0, 1.5, 2.0]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn reports_line_of_bad_data() {
        let path = temp_path("bad.txt");
        std::fs::write(&path, "0.0 1.0\n1.0e-3 oops\n").unwrap();
        let err = read_trace_file(&path).unwrap_err();
        match err {
            TraceError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_trace_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }

    #[test]
    fn write_then_read_round_trip() {
        let path = temp_path("roundtrip.txt");
        let time = [0.0, 1.0e-3, 2.0e-3];
        let pressure = [1.0, 1.25, 1.5];
        write_columns(&path, &[&time, &pressure]).unwrap();
        let series = read_trace_file(&path).unwrap();
        assert_eq!(series.len(), 3);
        assert!((series.values()[1] - 1.25).abs() < 1e-12);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_ragged_columns() {
        let path = temp_path("ragged.txt");
        let err = write_columns(&path, &[&[0.0, 1.0], &[0.0]]).unwrap_err();
        assert!(matches!(err, TraceError::Signal(_)));
    }
}
