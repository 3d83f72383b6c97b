// Errors surfaced to whoever drives a filing run.
//
// The calculation core itself never fails; these cover the checks made
// around it (missing uploads, empty datasets, file and export I/O).

use crate::standardizer::RecordKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IftaError {
    #[error("No {} sources were provided", .kind.code())]
    NoSources { kind: RecordKind },

    #[error("Unable to find fuel data. Confirm the CSV contains state and gallons columns.")]
    NoFuelData,

    #[error("Unable to find mileage data. Confirm the CSV contains state and miles columns.")]
    NoMileageData,

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, IftaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            IftaError::NoFuelData.to_string(),
            "Unable to find fuel data. Confirm the CSV contains state and gallons columns."
        );
        assert_eq!(
            IftaError::NoSources {
                kind: RecordKind::Mileage
            }
            .to_string(),
            "No mileage sources were provided"
        );
    }

    #[test]
    fn test_read_and_write_messages_differ() {
        let read = IftaError::Io {
            path: PathBuf::from("fuel.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let write = IftaError::Write {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(read.to_string(), "Failed to read fuel.csv: not found");
        assert_eq!(write.to_string(), "Failed to write out.csv: denied");
    }
}
