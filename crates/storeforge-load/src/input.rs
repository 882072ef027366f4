use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use storeforge_core::Table;

use crate::errors::LoadError;
use crate::records::LoadRecord;

/// Parse one intermediate CSV file into typed rows.
///
/// A missing file is `MissingInput`; a header that differs from the catalog
/// column order, or a record that does not parse, is `MalformedInput`.
pub fn read_pool<T: LoadRecord>(path: &Path, table: &Table) -> Result<Vec<T>, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(LoadError::MissingInput {
                table: T::KIND,
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(err.into()),
    };
    let malformed = |reason: String| LoadError::MalformedInput {
        table: T::KIND,
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let found: Vec<String> = reader
        .headers()
        .map_err(|err| malformed(err.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    let expected = table.column_names();
    if found != expected {
        return Err(malformed(format!(
            "expected columns [{}], found [{}]",
            expected.join(", "),
            found.join(", ")
        )));
    }

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(idx, record)| record.map_err(|err| malformed(format!("record {}: {err}", idx + 1))))
        .collect()
}
