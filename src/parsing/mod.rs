mod header;
mod positional;

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use csv::{ByteRecord, StringRecord};

pub use header::HeaderColumns;
pub use positional::PositionalColumns;

use crate::{error::CompileError, normalize::clean};

/// How the columns of a parcel export are located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLayout {
    /// By name, from the header record.
    Header(HeaderColumns),
    /// By fixed zero-based index.
    Positional(PositionalColumns),
}

/// Resolved column indices for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub city: Vec<usize>,
    pub number: Option<usize>,
    pub additional: Option<usize>,
    pub direction: Option<usize>,
    pub street: Option<usize>,
    pub suffix: Option<usize>,
    pub unit: Option<usize>,
    /// Records shorter than this are rejected instead of read as blanks.
    pub min_len: usize,
}

/// One cleaned parcel record, independent of the export's column layout.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParcelRow {
    pub city_candidates: Vec<String>,
    pub number: String,
    pub additional: String,
    pub direction: String,
    pub street: String,
    pub suffix: String,
    pub unit: String,
}

/// A data record as read from the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Parcel(ParcelRow),
    Short { len: usize },
}

impl ColumnLayout {
    fn read(&self, record: &ByteRecord) -> Record {
        if record.len() < self.min_len {
            return Record::Short { len: record.len() };
        }

        let cell = |index: Option<usize>| -> String {
            index
                .and_then(|i| record.get(i))
                .map(|bytes| clean(&String::from_utf8_lossy(bytes)).to_string())
                .unwrap_or_default()
        };

        Record::Parcel(ParcelRow {
            city_candidates: self.city.iter().map(|&i| cell(Some(i))).collect(),
            number: cell(self.number),
            additional: cell(self.additional),
            direction: cell(self.direction),
            street: cell(self.street),
            suffix: cell(self.suffix),
            unit: cell(self.unit),
        })
    }
}

/// Streaming reader over the data records of a parcel export.
pub struct ParcelSource<R: Read> {
    reader: csv::Reader<R>,
    layout: ColumnLayout,
    record: ByteRecord,
}

impl ParcelSource<Box<dyn Read>> {
    /// Open a CSV file, or the first CSV entry of a `.zip` archive.
    pub fn open(path: &Path, layout: &InputLayout) -> Result<Self, CompileError> {
        if !path.exists() {
            let shown = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            return Err(CompileError::InputMissing(shown));
        }

        ParcelSource::from_reader(open_input(path)?, layout)
    }
}

impl<R: Read> ParcelSource<R> {
    /// Wrap a CSV byte stream, consuming the header record when the layout has one.
    pub fn from_reader(source: R, layout: &InputLayout) -> Result<Self, CompileError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);
        let mut record = ByteRecord::new();

        let layout = match layout {
            InputLayout::Header(columns) => {
                if !reader.read_byte_record(&mut record)? {
                    return Err(CompileError::MissingHeader);
                }
                let header = StringRecord::from_byte_record_lossy(record.clone());
                columns.resolve(&header)?
            }
            InputLayout::Positional(columns) => {
                if columns.skip_header {
                    reader.read_byte_record(&mut record)?;
                }
                columns.layout()
            }
        };

        Ok(ParcelSource {
            reader,
            layout,
            record,
        })
    }

    /// Read the next data record, `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>, CompileError> {
        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.layout.read(&self.record)))
    }
}

fn open_input(path: &Path) -> Result<Box<dyn Read>, CompileError> {
    #[cfg(feature = "zip")]
    {
        let zipped = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if zipped {
            return read_zipped_csv(path);
        }
    }

    let file = File::open(path).map_err(|e| CompileError::Io(path.to_path_buf(), e))?;
    Ok(Box::new(BufReader::new(file)))
}

#[cfg(feature = "zip")]
fn read_zipped_csv(path: &Path) -> Result<Box<dyn Read>, CompileError> {
    use zip::ZipArchive;

    let file = File::open(path).map_err(|e| CompileError::Io(path.to_path_buf(), e))?;
    let mut zip = ZipArchive::new(file)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let name = entry.name().to_ascii_lowercase();

        if entry.is_dir() || !name.ends_with(".csv") {
            continue;
        }

        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|e| CompileError::Io(path.to_path_buf(), e))?;
        return Ok(Box::new(std::io::Cursor::new(buf)));
    }

    Err(CompileError::NoCsvInArchive(path.to_path_buf()))
}
