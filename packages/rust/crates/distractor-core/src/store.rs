//! Schema-evolving append for the flat CSV store.
//!
//! A store is a header row followed by data rows. [`append`] keeps every row
//! aligned with the caller's declared columns: when the on-disk header
//! differs, the whole file is remapped once and then the new row is appended.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tracing::{debug, info, warn};

use crate::projection::{AnnotationRecord, header_matches, migrate_rows, project_record};

/// Header and data rows of a store file, as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// First row of the file.
    pub header: Vec<String>,
    /// Remaining rows in file order.
    pub rows: Vec<Vec<String>>,
}

/// Append `record` to the store at `path`, projected onto `columns`.
///
/// Creates the file with a header when it does not exist. When the existing
/// header is not exactly `columns` (names and order), every existing row is
/// remapped by its old header name and the file is atomically replaced before
/// the append.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidInput`] when `columns` is empty, and
/// propagates any underlying I/O or CSV failure as [`io::Error`].
pub fn append<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    record: &AnnotationRecord,
    columns: &[S],
) -> io::Result<()> {
    let path = path.as_ref();
    if columns.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "a store needs at least one column",
        ));
    }
    let outgoing = project_record(record, columns);

    if !path.exists() {
        create_with_row(path, columns, &outgoing)?;
        debug!(path = %path.display(), "created store with header");
        return Ok(());
    }

    let header = read_header(path)?;
    if !header_matches(&header, columns) {
        migrate_file(path, columns)?;
    }
    append_row(path, &outgoing)
}

/// Read a whole store file.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or parsed.
pub fn read_store<P: AsRef<Path>>(path: P) -> io::Result<StoreSnapshot> {
    let mut records = open_reader(path.as_ref())?.into_records();
    let header = match records.next() {
        Some(first) => record_to_vec(&first?),
        None => return Ok(StoreSnapshot::default()),
    };
    let rows = records
        .map(|record| record.map(|r| record_to_vec(&r)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StoreSnapshot { header, rows })
}

fn open_reader(path: &Path) -> io::Result<csv::Reader<File>> {
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?)
}

fn record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

/// First row of the file. A blank first line counts as an empty header, so
/// such a file is migrated and the blank line dropped.
fn read_header(path: &Path) -> io::Result<Vec<String>> {
    let mut first_line = String::new();
    BufReader::new(File::open(path)?).read_line(&mut first_line)?;
    if first_line.trim_end_matches(['\r', '\n']).is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = open_reader(path)?;
    let mut record = StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record_to_vec(&record))
    } else {
        Ok(Vec::new())
    }
}

fn writer_for<W: Write>(sink: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(sink)
}

fn create_with_row<S: AsRef<str>>(path: &Path, columns: &[S], row: &[String]) -> io::Result<()> {
    let mut writer = writer_for(File::create(path)?);
    writer.write_record(columns.iter().map(AsRef::<str>::as_ref))?;
    writer.write_record(row)?;
    writer.flush()
}

/// Rows are remapped by the first non-blank row, which is the header the
/// CSV reader sees.
fn migrate_file<S: AsRef<str>>(path: &Path, columns: &[S]) -> io::Result<()> {
    let snapshot = read_store(path)?;
    let migrated = migrate_rows(&snapshot.header, &snapshot.rows, columns);
    rewrite_atomically(path, columns, &migrated)?;
    info!(
        path = %path.display(),
        old_columns = snapshot.header.len(),
        new_columns = columns.len(),
        rows = migrated.len(),
        "migrated store header"
    );
    Ok(())
}

/// Write header and rows to a temp file beside `path`, fsync, then rename
/// over the original.
fn rewrite_atomically<S: AsRef<str>>(
    path: &Path,
    columns: &[S],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("store.csv");
    let temp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let result = write_snapshot(&temp_path, columns, rows).and_then(|()| fs::rename(&temp_path, path));
    if result.is_err()
        && let Err(error) = fs::remove_file(&temp_path)
        && error.kind() != io::ErrorKind::NotFound
    {
        warn!(
            path = %temp_path.display(),
            error = %error,
            "failed to remove temporary store file"
        );
    }
    result
}

fn write_snapshot<S: AsRef<str>>(path: &Path, columns: &[S], rows: &[Vec<String>]) -> io::Result<()> {
    let mut writer = writer_for(File::create(path)?);
    writer.write_record(columns.iter().map(AsRef::<str>::as_ref))?;
    for row in rows {
        writer.write_record(row)?;
    }
    let file = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    file.sync_all()
}

fn append_row(path: &Path, row: &[String]) -> io::Result<()> {
    let mut file = OpenOptions::new().read(true).append(true).open(path)?;
    if !ends_with_line_break(&mut file)? {
        file.write_all(b"\r\n")?;
    }
    let mut writer = writer_for(file);
    writer.write_record(row)?;
    writer.flush()
}

fn ends_with_line_break(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
