//! Temp file lifecycle for a single attempt.
//!
//! Each attempt streams into `<destination>.part`. An accepted download is
//! renamed over the destination; a rejected one is removed, so the
//! destination only ever changes on acceptance.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Sequential writer for one attempt's temp file.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create the temp file at `temp_path`, truncating any leftover from an
    /// earlier attempt. The parent directory is not created.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        Ok(PartFile {
            file,
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    /// Bytes written through this handle so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Size of the temp file as reported by the filesystem.
    pub fn len_on_disk(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Atomically rename the temp file to `final_path`, replacing it. Consumes
    /// the writer and closes the file. Fails across filesystems.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        std::fs::rename(&temp_path, final_path)
    }

    /// Close and remove the temp file.
    pub fn discard(self) -> io::Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        match std::fs::remove_file(&temp_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Path for the temp file: appends `.part` to the final path (e.g. `model.tflite` → `model.tflite.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
