//! Input data handling for cache simulation
//!
//! Trace files are CSV with the columns `timestamp,key,size`. Extra columns
//! (such as the `ttl` column other tools emit) are ignored, as are an optional
//! header row and lines starting with `#`. Files are matched with `*.csv` and
//! `*.log` globs and replayed in name order, one record at a time.

use crate::models::Request;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// File extensions picked up from the input directory
const TRACE_PATTERNS: [&str; 2] = ["*.csv", "*.log"];

/// Error types for trace parsing
#[derive(Debug)]
pub enum LogParseError {
    /// The input directory cannot be turned into a glob pattern
    Pattern(glob::PatternError),
    /// A directory entry could not be read while globbing
    Glob(glob::GlobError),
    /// Opening or parsing a trace file failed
    Csv { path: PathBuf, source: csv::Error },
    /// The directory path is not valid UTF-8
    NonUtf8Path(PathBuf),
}

impl fmt::Display for LogParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogParseError::Pattern(err) => write!(f, "invalid trace pattern: {err}"),
            LogParseError::Glob(err) => write!(f, "cannot list trace files: {err}"),
            LogParseError::Csv { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            LogParseError::NonUtf8Path(path) => {
                write!(f, "input path is not valid UTF-8: {}", path.display())
            }
        }
    }
}

impl std::error::Error for LogParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LogParseError::Pattern(err) => Some(err),
            LogParseError::Glob(err) => Some(err),
            LogParseError::Csv { source, .. } => Some(source),
            LogParseError::NonUtf8Path(_) => None,
        }
    }
}

impl From<glob::PatternError> for LogParseError {
    fn from(err: glob::PatternError) -> Self {
        LogParseError::Pattern(err)
    }
}

impl From<glob::GlobError> for LogParseError {
    fn from(err: glob::GlobError) -> Self {
        LogParseError::Glob(err)
    }
}

/// One trace row; trailing columns are not deserialized
#[derive(Debug, Deserialize)]
struct TraceRecord {
    timestamp: u64,
    key: String,
    size: usize,
}

/// Reader for cache request traces
pub struct LogReader {
    input_dir: PathBuf,
}

impl LogReader {
    /// Create a new reader for the given input directory
    pub fn new<P: AsRef<Path>>(input_dir: P) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
        }
    }

    /// Get all trace files in the input directory, sorted by name
    pub fn get_log_files(&self) -> Result<Vec<PathBuf>, LogParseError> {
        let dir = self
            .input_dir
            .to_str()
            .ok_or_else(|| LogParseError::NonUtf8Path(self.input_dir.clone()))?;
        let dir = glob::Pattern::escape(dir);

        let mut files = Vec::new();
        for pattern in TRACE_PATTERNS {
            for entry in glob::glob(&format!("{dir}/{pattern}"))? {
                let path = entry?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }

        // Sort files by name for consistent ordering
        files.sort();
        Ok(files)
    }

    /// Parse every trace file into memory
    pub fn parse_all_files(&self) -> Result<Vec<Request>, LogParseError> {
        self.stream_requests()?.collect()
    }

    /// Create a streaming iterator over all requests in all trace files.
    pub fn stream_requests(&self) -> Result<RequestIterator, LogParseError> {
        let files = self.get_log_files()?;
        Ok(RequestIterator::new(files))
    }
}

/// Iterator that streams requests from multiple trace files
pub struct RequestIterator {
    files: Vec<PathBuf>,
    next_file: usize,
    current: Option<(PathBuf, csv::StringRecordsIntoIter<File>)>,
}

impl RequestIterator {
    fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            next_file: 0,
            current: None,
        }
    }

    /// Open the next file for reading
    fn open_next_file(&mut self) -> Option<Result<(), LogParseError>> {
        let path = self.files.get(self.next_file)?.clone();
        self.next_file += 1;

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(&path);
        Some(match reader {
            Ok(reader) => {
                self.current = Some((path, reader.into_records()));
                Ok(())
            }
            Err(source) => Err(LogParseError::Csv { path, source }),
        })
    }
}

impl Iterator for RequestIterator {
    type Item = Result<Request, LogParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                if let Err(err) = self.open_next_file()? {
                    return Some(Err(err));
                }
            }

            let (path, records) = self.current.as_mut()?;
            let record = match records.next() {
                Some(Ok(record)) => record,
                Some(Err(source)) => {
                    let path = path.clone();
                    return Some(Err(LogParseError::Csv { path, source }));
                }
                None => {
                    // EOF on current file, move to next
                    self.current = None;
                    continue;
                }
            };

            if record.get(0) == Some("timestamp") {
                continue;
            }

            return Some(
                record
                    .deserialize::<TraceRecord>(None)
                    .map(|row| Request::new(row.timestamp, row.key, row.size))
                    .map_err(|source| LogParseError::Csv {
                        path: path.clone(),
                        source,
                    }),
            );
        }
    }
}
