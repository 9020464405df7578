//! Error types for the oidtrim-core library.
//!
//! Every stage of the pipeline reports failure through [`Error`]. None of them
//! recover locally: the first error aborts the run and is handed back to the
//! caller, which decides how to exit.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for oidtrim operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit status used for failures that did not come from an external tool
pub const GENERIC_EXIT_CODE: i32 = 1;

/// Error type for all oidtrim operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An external generator exited with a non-zero status
    #[error("'{program}' exited with status {exit_code}: {stderr}")]
    ExternalTool {
        /// Program that was run
        program: String,
        /// Exit status reported by the program (-1 if killed by a signal)
        exit_code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// An external generator could not be started
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that could not be started
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a directory
    #[error("failed to remove directory '{path}': {source}")]
    DirectoryRemove {
        /// Path to the directory that failed to remove
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file
    #[error("failed to copy '{from}' to '{to}': {source}")]
    FileCopy {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new external tool failure
    pub fn external_tool(
        program: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ExternalTool {
            program: program.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Creates a new spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory removal error
    pub fn directory_remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRemove {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file copy error
    pub fn file_copy(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileCopy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Process exit status this error should terminate with.
    ///
    /// External tool failures keep the tool's own status; everything else
    /// maps to [`GENERIC_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalTool { exit_code, .. } if *exit_code > 0 => *exit_code,
            _ => GENERIC_EXIT_CODE,
        }
    }

    /// Captured stderr of a failed external tool, if that is what failed
    pub fn tool_stderr(&self) -> Option<&str> {
        match self {
            Self::ExternalTool { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
