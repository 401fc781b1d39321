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

//! # Lamb Core
//!
//! Foundational crate containing the plain data types and configuration
//! contracts shared by the logging service and the code that feeds it.
//!
//! This crate defines the abstract "what" of a log event: its [`Severity`],
//! the immutable [`Record`] a producer hands over, and the [`FormatOptions`]
//! and [`LoggerConfig`] that shape how records end up on disk. The
//! `lamb-telemetry` crate provides the service that actually drains and
//! writes them.

#![warn(missing_docs)]

pub mod config;
pub mod options;
pub mod record;
pub mod severity;

pub use config::{ConfigError, LoggerConfig, SinkConfig};
pub use options::FormatOptions;
pub use record::{Record, ThreadTag};
pub use severity::Severity;

/// Name of the implicit sink that receives a copy of every record.
pub const GLOBAL_SUBSYSTEM: &str = "Global";

/// Subsystem used when a producer does not name one.
pub const DEFAULT_SUBSYSTEM: &str = "Core";

/// Size at which a sink's current file is rotated (5 MiB).
pub const DEFAULT_ROTATION_THRESHOLD: u64 = 5 * 1024 * 1024;
