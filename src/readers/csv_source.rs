use crate::error::{ProcessingError, Result};
use crate::utils::constants::DEFAULT_DELIMITER;
use encoding_rs::Encoding;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Parsed contents of a delimited table
#[derive(Debug)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

/// Decodes and splits delimited text files
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
    encoding: &'static Encoding,
    use_mmap: bool,
}

impl CsvSource {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            encoding: encoding_rs::UTF_8,
            use_mmap: false,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(ProcessingError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                delimiter
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| ProcessingError::Config(format!("Unknown encoding: {}", label)))?;
        Ok(self)
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Read the whole file as text in the configured encoding
    pub fn read_text(&self, path: &Path) -> Result<String> {
        if self.use_mmap {
            let file = File::open(path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(self.decode(&mmap))
        } else {
            let bytes = std::fs::read(path)?;
            Ok(self.decode(&bytes))
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let (text, used, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            tracing::warn!(
                encoding = used.name(),
                "Input contains byte sequences invalid for the encoding; replaced"
            );
        }
        text.into_owned()
    }

    pub fn read_table(&self, path: &Path) -> Result<CsvTable> {
        let text = self.read_text(path)?;
        self.parse_table(&text)
    }

    pub fn parse_table(&self, text: &str) -> Result<CsvTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() {
            return Err(ProcessingError::InvalidFormat("Missing header row".to_string()));
        }

        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(CsvTable { headers, rows })
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTable {
    /// 1-based line of a row, for error messages
    pub fn line_of(row: &csv::StringRecord) -> u64 {
        row.position().map(|p| p.line()).unwrap_or(0)
    }
}
