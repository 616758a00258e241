//! Line-oriented text IO

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::util::{safe_create_file, safe_open_file};
use crate::error::{PipelineError, Result};

/// Read every line of a text file
///
/// Lines are split on `\n` with a trailing `\r` removed. Invalid UTF-8 is replaced
/// rather than failing the whole partition.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = safe_open_file(path, "reading input partition")?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| PipelineError::path_with_source(path, "Failed to read line", e))?;
        if read == 0 {
            break;
        }
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
        lines.push(String::from_utf8_lossy(&buffer).into_owned());
    }

    Ok(lines)
}

/// Buffered writer for `key\tvalue` output lines
pub struct LineWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl LineWriter {
    /// Create the output file, truncating anything already there
    pub fn create(path: &Path) -> Result<Self> {
        let file = safe_create_file(path, "writing job output")?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    /// Write one line; the newline is appended here
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")
            .map_err(|e| PipelineError::path_with_source(&self.path, "Failed to write line", e))?;
        self.lines += 1;
        Ok(())
    }

    /// Flush and close the file, returning the number of lines written
    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|e| PipelineError::path_with_source(&self.path, "Failed to flush output", e))?;
        Ok(self.lines)
    }
}
