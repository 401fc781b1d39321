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

//! The immutable value describing one log event.

use crate::severity::Severity;
use chrono::{DateTime, Local};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_TAG: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_TAG: ThreadTag = ThreadTag(NEXT_THREAD_TAG.fetch_add(1, Ordering::Relaxed));
}

/// A short, process-unique identifier for the thread that produced a record.
///
/// `std::thread::ThreadId` has no stable numeric form, so each thread is
/// handed a sequential tag the first time it logs. The tag never changes for
/// the lifetime of that thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadTag(pub u64);

impl ThreadTag {
    /// Returns the tag of the calling thread, assigning one if needed.
    pub fn current() -> Self {
        THREAD_TAG.with(|tag| *tag)
    }
}

impl fmt::Display for ThreadTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One log event, captured on the producing thread.
///
/// The timestamp and thread tag are taken when the record is built, which is
/// the moment it is enqueued, not the moment the worker writes it.
#[derive(Debug, Clone)]
pub struct Record {
    severity: Severity,
    subsystem: String,
    message: String,
    timestamp: DateTime<Local>,
    thread: ThreadTag,
}

impl Record {
    /// Creates a record stamped with the current local time and thread.
    pub fn new(
        severity: Severity,
        subsystem: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::at(
            severity,
            subsystem,
            message,
            Local::now(),
            ThreadTag::current(),
        )
    }

    /// Creates a record with an explicit timestamp and thread tag.
    pub fn at(
        severity: Severity,
        subsystem: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Local>,
        thread: ThreadTag,
    ) -> Self {
        Self {
            severity,
            subsystem: subsystem.into(),
            message: message.into(),
            timestamp,
            thread,
        }
    }

    /// The record's severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The subsystem tag that selects the target sink.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// The message text, unescaped.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// When the record was created.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// The thread that created the record.
    pub fn thread(&self) -> ThreadTag {
        self.thread
    }
}
