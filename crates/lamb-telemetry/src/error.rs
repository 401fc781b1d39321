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

//! Error types for sink management.

use std::path::PathBuf;
use thiserror::Error;

/// A failure while opening, rotating or writing a sink file.
///
/// These never cross the public logging API: they are reported on stderr by
/// the caller that observes them and the affected sink degrades instead.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The parent directory of a sink file could not be created.
    #[error("cannot create log directory '{path}': {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A sink file could not be opened at registration.
    #[error("cannot open log file for subsystem '{subsystem}': {path}: {source}")]
    Open {
        /// The subsystem being registered.
        subsystem: String,
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The next rotated file could not be opened.
    #[error("failed to rotate log file to {path}: {source}")]
    Rotate {
        /// The rotated file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A line could not be written to an open sink.
    #[error("failed to write to log file {path}: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
