//! CSV archiving of cyclic data
//!
//! Each archive is a single CSV file inside the session's archive directory,
//! with one record written per call to `Archiver::serialise`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::File;
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    writer: Writer<File>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive file: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    ///
    /// Any existing file at that path is truncated.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let file = File::create(session.arch_root.join(path))
            .map_err(ArchiveError::CreateError)?;

        let writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self { writer })
    }

    /// Serialise a record into the archive.
    ///
    /// The header line is taken from the field names of the first record.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        self.writer.serialize(record).map_err(ArchiveError::WriteError)?;
        self.writer.flush().map_err(ArchiveError::FlushError)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Record {
        time_s: f64,
        limited: bool
    }

    #[test]
    fn test_archiver() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session {
            session_root: dir.path().to_path_buf(),
            arch_root: dir.path().to_path_buf(),
            log_file_path: dir.path().join("test.log")
        };

        let mut archiver = Archiver::from_path(&session, "records.csv").unwrap();
        archiver.serialise(Record { time_s: 0.0, limited: false }).unwrap();
        archiver.serialise(Record { time_s: 0.1, limited: true }).unwrap();

        let contents = std::fs::read_to_string(dir.path().join("records.csv")).unwrap();
        assert_eq!(contents, "time_s,limited\n0.0,false\n0.1,true\n");
    }

    #[test]
    fn test_archiver_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session {
            session_root: dir.path().to_path_buf(),
            arch_root: dir.path().join("missing"),
            log_file_path: dir.path().join("test.log")
        };

        assert!(matches!(
            Archiver::from_path(&session, "records.csv"),
            Err(ArchiveError::CreateError(_))
        ));
    }
}
