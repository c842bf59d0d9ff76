use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes rendered output files, creating parent directories as needed
#[derive(Debug, Default)]
pub struct FileWriter {
    generated_files: Vec<PathBuf>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` to `path`, replacing any previous file.
    /// The handle is flushed and closed before this returns, on success or error.
    pub fn write_output(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        {
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(content.as_bytes())?;
            writer.flush()?;
        }

        self.generated_files.push(path.to_path_buf());
        Ok(())
    }

    pub fn generated_files(&self) -> &[PathBuf] {
        &self.generated_files
    }
}
