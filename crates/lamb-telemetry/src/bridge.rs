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

//! Adapter that routes `log` crate macros into the log service.
//!
//! Engine code logs with `log::info!` and friends; installing a [`LogBridge`]
//! as the global logger turns each of those calls into a record on the
//! service queue. The record's subsystem is picked from its target: the
//! longest registered route whose prefix matches the target wins, anything
//! else goes to the default subsystem.

use crate::service::LogHandle;
use lamb_core::{Severity, DEFAULT_SUBSYSTEM};
use log::{LevelFilter, Metadata, SetLoggerError};

// Diagnostics emitted by this crate are never fed back into the queue.
const OWN_TARGET: &str = "lamb_telemetry";

/// A `log::Log` implementation backed by a [`LogHandle`].
#[derive(Debug)]
pub struct LogBridge {
    handle: LogHandle,
    max_level: LevelFilter,
    default_subsystem: String,
    routes: Vec<(String, String)>,
}

impl LogBridge {
    /// Creates a bridge forwarding records up to `max_level`.
    pub fn new(handle: LogHandle, max_level: LevelFilter) -> Self {
        Self {
            handle,
            max_level,
            default_subsystem: DEFAULT_SUBSYSTEM.to_string(),
            routes: Vec::new(),
        }
    }

    /// Sets the subsystem used for targets without a route.
    pub fn with_default_subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.default_subsystem = subsystem.into();
        self
    }

    /// Routes targets under `prefix` (e.g. `"game::physics"`) to `subsystem`.
    pub fn route(mut self, prefix: impl Into<String>, subsystem: impl Into<String>) -> Self {
        self.routes.push((prefix.into(), subsystem.into()));
        // Longest prefix first so the first match is the most specific one.
        self.routes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    /// Returns the subsystem a record with `target` is written under.
    pub fn subsystem_for(&self, target: &str) -> &str {
        self.routes
            .iter()
            .find(|(prefix, _)| is_under(target, prefix))
            .map(|(_, subsystem)| subsystem.as_str())
            .unwrap_or(self.default_subsystem.as_str())
    }

    /// Installs this bridge as the process-wide `log` backend.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

fn is_under(target: &str, prefix: &str) -> bool {
    match target.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.max_level && !is_under(metadata.target(), OWN_TARGET)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let subsystem = self.subsystem_for(record.target());
        self.handle.log(
            Severity::from(record.level()),
            record.args().to_string(),
            subsystem,
        );
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{LogService, ServiceConfig};
    use lamb_core::FormatOptions;
    use log::{Level, Log};
    use tempfile::tempdir;

    fn bridge(service: &LogService) -> LogBridge {
        LogBridge::new(service.handle(), LevelFilter::Info)
            .route("game", "Gameplay")
            .route("game::physics", "Physics")
    }

    #[test]
    fn test_longest_route_wins() {
        let service = LogService::with_console(ServiceConfig::default(), std::io::sink());
        let bridge = bridge(&service);

        assert_eq!(bridge.subsystem_for("game::physics::solver"), "Physics");
        assert_eq!(bridge.subsystem_for("game::physics"), "Physics");
        assert_eq!(bridge.subsystem_for("game::ai"), "Gameplay");
        assert_eq!(bridge.subsystem_for("gameplay_tools"), "Core");
        assert_eq!(bridge.subsystem_for("wgpu_core"), "Core");
    }

    #[test]
    fn test_level_filter_and_own_target() {
        let service = LogService::with_console(ServiceConfig::default(), std::io::sink());
        let bridge = bridge(&service);

        let info = Metadata::builder().level(Level::Info).target("game").build();
        let debug = Metadata::builder().level(Level::Debug).target("game").build();
        let own = Metadata::builder()
            .level(Level::Error)
            .target("lamb_telemetry::worker")
            .build();

        assert!(bridge.enabled(&info));
        assert!(!bridge.enabled(&debug));
        assert!(!bridge.enabled(&own));
    }

    #[test]
    fn test_records_reach_routed_sink() {
        let dir = tempdir().unwrap();
        let service = LogService::with_console(ServiceConfig::default(), std::io::sink());
        service.register_sink("Physics", dir.path().join("Physics.log"), false);
        service.init(FormatOptions::new(false, false, false));
        let bridge = bridge(&service).with_default_subsystem("Engine");

        bridge.log(
            &log::Record::builder()
                .args(format_args!("contact budget exceeded"))
                .level(Level::Warn)
                .target("game::physics::contacts")
                .build(),
        );
        bridge.log(
            &log::Record::builder()
                .args(format_args!("filtered out"))
                .level(Level::Trace)
                .target("game::physics")
                .build(),
        );
        service.shutdown();

        let content = std::fs::read_to_string(dir.path().join("Physics.log")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[Physics] [WARN] contact budget exceeded"));
    }
}
