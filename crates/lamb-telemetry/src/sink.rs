// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A single subsystem output file and its rotation bookkeeping.

use crate::error::SinkError;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// An open log file bound to one subsystem.
///
/// A sink is only ever touched by the worker thread once installed, so it
/// carries no synchronization of its own.
#[derive(Debug)]
pub struct Sink {
    subsystem: String,
    /// The path given at registration. Rotated names derive from it.
    base_path: PathBuf,
    /// The file currently receiving lines.
    current_path: PathBuf,
    file: Option<File>,
    rotation_index: u32,
    bytes_written: u64,
}

impl Sink {
    /// Opens the file for `subsystem` at `path`, creating parent directories.
    ///
    /// With `append` the existing content is kept; otherwise the file is
    /// truncated.
    pub fn open(
        subsystem: impl Into<String>,
        path: impl Into<PathBuf>,
        append: bool,
    ) -> Result<Self, SinkError> {
        let subsystem = subsystem.into();
        let path = path.into();

        ensure_parent_dir(&path)?;

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|source| SinkError::Open {
                subsystem: subsystem.clone(),
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            subsystem,
            base_path: path.clone(),
            current_path: path,
            file: Some(file),
            rotation_index: 0,
            bytes_written: 0,
        })
    }

    /// Writes one line, rotating first if the current file reached `threshold` bytes.
    ///
    /// A sink without a handle (after a failed rotation) drops the line.
    pub fn write_line(&mut self, line: &str, threshold: u64) -> Result<(), SinkError> {
        if self.file.is_none() {
            return Ok(());
        }

        if self.reached(threshold) {
            self.rotate()?;
        }

        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes())
            .map_err(|source| SinkError::Write {
                path: self.current_path.clone(),
                source,
            })?;
        self.bytes_written += buf.len() as u64;
        Ok(())
    }

    // A failed size query counts as "not reached".
    fn reached(&self, threshold: u64) -> bool {
        fs::metadata(&self.current_path)
            .map(|meta| meta.len() >= threshold)
            .unwrap_or(false)
    }

    fn rotate(&mut self) -> Result<(), SinkError> {
        self.close();
        self.rotation_index += 1;
        self.current_path = rotated_path(&self.base_path, self.rotation_index);
        // Rotated files left by an earlier run are never reopened.
        while self.current_path.is_file() {
            self.rotation_index += 1;
            self.current_path = rotated_path(&self.base_path, self.rotation_index);
        }
        self.bytes_written = 0;

        log::debug!(
            "Rotating sink '{}' to {}",
            self.subsystem,
            self.current_path.display()
        );

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.current_path)
            .map_err(|source| SinkError::Rotate {
                path: self.current_path.clone(),
                source,
            })?;
        self.file = Some(file);
        Ok(())
    }

    /// Flushes and releases the file handle. Further writes are dropped.
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }

    /// The subsystem this sink serves.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// The path given at registration.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The file currently receiving lines.
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// How many times this sink has rotated.
    pub fn rotation_index(&self) -> u32 {
        self.rotation_index
    }

    /// Bytes written through the current handle.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Whether the sink still has a file to write to.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        self.close();
    }
}

/// Returns `<dir>/<stem>_<index><ext>` for the registered path `base`.
pub fn rotated_path(base: &Path, index: u32) -> PathBuf {
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(ext) => format!("{stem}_{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{index}"),
    };
    base.with_file_name(name)
}

fn ensure_parent_dir(path: &Path) -> Result<(), SinkError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
