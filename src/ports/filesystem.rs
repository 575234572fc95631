//! Filesystem port for output-file I/O.

use std::path::Path;

/// Provides filesystem access for the output writer.
///
/// Abstracting the filesystem lets the writer's conflict and versioning
/// logic run against an in-memory fake in tests.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Writes the given contents to a file, creating parent directories
    /// as needed and overwriting any existing file at the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Renames `from` to `to`, replacing `to` if it exists.
    ///
    /// The live adapter maps this onto the platform rename call, which is
    /// atomic within a filesystem. The writer relies on that to never leave
    /// a partial output file.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or the rename fails.
    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
