//! CSV row sinks and the writer that fans one row out to all of them

use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Destination for output rows
pub trait RowSink {
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Called once after the last row
    fn finish(&mut self) -> Result<()>;
}

/// CSV over any `Write`. Rows are flushed as they are written.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}

impl<W: Write> RowSink for CsvSink<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer.write_record(row)?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Live copy on standard output
pub fn stdout_sink() -> CsvSink<io::Stdout> {
    CsvSink::new(io::stdout())
}

/// CSV file written to `<path>.part` and moved into place on `finish`.
///
/// Dropped without finishing, the partial file is removed.
pub struct FileSink {
    csv: CsvSink<File>,
    part_path: PathBuf,
    path: PathBuf,
    finished: bool,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let mut part_name = path
            .file_name()
            .ok_or_else(|| anyhow!("Output path has no file name: {}", path.display()))?
            .to_os_string();
        part_name.push(".part");
        let part_path = path.with_file_name(part_name);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(&part_path)
            .with_context(|| format!("Failed to create output file: {}", part_path.display()))?;

        Ok(Self {
            csv: CsvSink::new(file),
            part_path,
            path: path.to_path_buf(),
            finished: false,
        })
    }
}

impl RowSink for FileSink {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.csv
            .write_row(row)
            .with_context(|| format!("Failed to write {}", self.part_path.display()))
    }

    fn finish(&mut self) -> Result<()> {
        self.csv.finish()?;
        fs::rename(&self.part_path, &self.path).with_context(|| {
            format!(
                "Failed to move {} to {}",
                self.part_path.display(),
                self.path.display()
            )
        })?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if !self.finished {
            let _ = fs::remove_file(&self.part_path);
        }
    }
}

/// Writes every row to every sink; any sink failing fails the write
pub struct TeeWriter<'a> {
    sinks: Vec<&'a mut dyn RowSink>,
    rows_written: usize,
}

impl<'a> TeeWriter<'a> {
    pub fn new(sinks: Vec<&'a mut dyn RowSink>) -> Self {
        Self {
            sinks,
            rows_written: 0,
        }
    }

    pub fn write_row(&mut self, row: &[String]) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.write_row(row)?;
        }
        self.rows_written += 1;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.finish()?;
        }
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{BrokenSink, MemorySink};
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn tmp(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("korail_stations_{}_{}", std::process::id(), name));
        p
    }

    #[test]
    fn test_csv_sink_quotes_embedded_commas() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_row(&row(&["역코드", "비고", "좌표"])).unwrap();
        sink.write_row(&row(&["0001", "a, b", "37.5,127"])).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.get_ref().clone()).unwrap();
        assert_eq!(text, "역코드,비고,좌표\n0001,\"a, b\",\"37.5,127\"\n");
    }

    #[test]
    fn test_csv_sink_rejects_ragged_rows() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_row(&row(&["a", "b"])).unwrap();
        assert!(sink.write_row(&row(&["1", "2", "3"])).is_err());
    }

    #[test]
    fn test_tee_writes_same_rows_everywhere() {
        let mut a = MemorySink::default();
        let mut b = CsvSink::new(Vec::new());
        {
            let mut tee = TeeWriter::new(vec![&mut a as &mut dyn RowSink, &mut b]);
            tee.write_row(&row(&["h1", "h2"])).unwrap();
            tee.write_row(&row(&["1", "2"])).unwrap();
            tee.finish().unwrap();
            assert_eq!(tee.rows_written(), 2);
        }
        assert_eq!(a.rows, vec![row(&["h1", "h2"]), row(&["1", "2"])]);
        assert!(a.finished);
        assert_eq!(b.get_ref().as_slice(), b"h1,h2\n1,2\n");
    }

    #[test]
    fn test_tee_fails_when_any_sink_fails() {
        let mut good = MemorySink::default();
        let mut broken = BrokenSink;
        let mut tee = TeeWriter::new(vec![&mut good as &mut dyn RowSink, &mut broken]);
        assert!(tee.write_row(&row(&["x"])).is_err());
        assert_eq!(tee.rows_written(), 0);
    }

    #[test]
    fn test_file_sink_moves_into_place() {
        let path = tmp("finished.csv");
        let _ = fs::remove_file(&path);
        let mut sink = FileSink::create(&path).unwrap();
        sink.write_row(&row(&["a", "b"])).unwrap();
        sink.finish().unwrap();
        drop(sink);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_sink_unfinished_leaves_nothing() {
        let path = tmp("abandoned.csv");
        let _ = fs::remove_file(&path);
        let mut sink = FileSink::create(&path).unwrap();
        let part = sink.part_path.clone();
        sink.write_row(&row(&["a", "b"])).unwrap();
        assert!(part.exists());
        drop(sink);
        assert!(!part.exists());
        assert!(!path.exists());
    }
}
