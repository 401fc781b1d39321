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

//! # Lamb Telemetry
//!
//! Asynchronous, multi-sink logging service for the engine.
//!
//! Any thread enqueues records through a [`LogHandle`]; a single worker
//! thread drains them in FIFO order, renders each one (human-readable or
//! structured), writes it to its subsystem's file and to the `Global` file,
//! and optionally mirrors it to the console. Files rotate once they reach a
//! size threshold. [`LogService::shutdown`] returns only after every record
//! queued before the call has been written.

#![warn(missing_docs)]

pub mod bridge;
pub mod error;
pub mod format;
pub mod registry;
pub mod service;
pub mod sink;

mod worker;

pub use bridge::LogBridge;
pub use error::SinkError;
pub use registry::SinkRegistry;
pub use service::{LifecycleState, LogHandle, LogService, ServiceConfig, SubsystemLogger};
pub use sink::Sink;
