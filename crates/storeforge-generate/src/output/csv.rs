use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use storeforge_core::Table;

/// Bytes and digest of a written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub bytes: u64,
    pub sha256: String,
}

/// Write an entity pool as CSV with the table's header row.
///
/// The header comes from the catalog column order; records are serialized
/// field by field, so entity structs must declare fields in the same order.
pub fn write_table_csv<T: Serialize>(
    path: &Path,
    table: &Table,
    rows: &[T],
) -> Result<WrittenFile, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let digesting = DigestWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(digesting);

    writer.write_record(table.column_names())?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let digesting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(digesting.finish())
}

struct DigestWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn finish(self) -> WrittenFile {
        WrittenFile {
            bytes: self.bytes,
            sha256: hex::encode(self.hasher.finalize()),
        }
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
