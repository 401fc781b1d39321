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

//! Subsystem-to-sink routing table.

use crate::error::SinkError;
use crate::sink::Sink;
use lamb_core::{DEFAULT_ROTATION_THRESHOLD, GLOBAL_SUBSYSTEM};
use std::collections::HashMap;

/// Maps subsystem names to their open sinks.
///
/// Owned by the worker thread for the lifetime of the service, then handed
/// back to the lifecycle controller for the final close.
#[derive(Debug)]
pub struct SinkRegistry {
    sinks: HashMap<String, Sink>,
    rotation_threshold: u64,
}

impl SinkRegistry {
    /// Creates an empty registry rotating files at `rotation_threshold` bytes.
    pub fn new(rotation_threshold: u64) -> Self {
        Self {
            sinks: HashMap::new(),
            rotation_threshold,
        }
    }

    /// Installs a sink, replacing any previous sink for the same subsystem.
    ///
    /// The replaced sink's file is closed before the new one takes over.
    pub fn install(&mut self, sink: Sink) {
        let subsystem = sink.subsystem().to_string();
        if let Some(mut previous) = self.sinks.insert(subsystem, sink) {
            log::debug!(
                "Replacing sink '{}' ({})",
                previous.subsystem(),
                previous.current_path().display()
            );
            previous.close();
        }
    }

    /// Writes a line to the subsystem's sink and mirrors it to the global sink.
    ///
    /// Records tagged with the global subsystem itself are written once.
    /// Subsystems without a sink of their own only reach the global sink.
    pub fn dispatch(&mut self, subsystem: &str, line: &str) {
        self.write_to(subsystem, line);
        if subsystem != GLOBAL_SUBSYSTEM {
            self.write_to(GLOBAL_SUBSYSTEM, line);
        }
    }

    fn write_to(&mut self, subsystem: &str, line: &str) {
        let Some(sink) = self.sinks.get_mut(subsystem) else {
            return;
        };
        match sink.write_line(line, self.rotation_threshold) {
            Ok(()) => {}
            Err(err @ SinkError::Rotate { .. }) => eprintln!("[LOGGER] {err}"),
            Err(err) => log::debug!("Dropped line for '{subsystem}': {err}"),
        }
    }

    /// Closes every sink and empties the registry.
    pub fn close_all(&mut self) {
        for sink in self.sinks.values_mut() {
            sink.close();
        }
        self.sinks.clear();
    }

    /// Returns the sink registered for `subsystem`.
    pub fn get(&self, subsystem: &str) -> Option<&Sink> {
        self.sinks.get(subsystem)
    }

    /// Returns the number of registered sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns true if no sinks are registered.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_dispatch_mirrors_to_global() {
        let dir = tempdir().unwrap();
        let mut registry = SinkRegistry::default();
        registry.install(Sink::open("Global", dir.path().join("Global.log"), false).unwrap());
        registry.install(Sink::open("Physics", dir.path().join("Physics.log"), false).unwrap());

        registry.dispatch("Physics", "p1");
        registry.dispatch("Global", "g1");
        registry.dispatch("Ghost", "x1");
        registry.close_all();

        assert_eq!(lines(&dir.path().join("Physics.log")), vec!["p1"]);
        assert_eq!(
            lines(&dir.path().join("Global.log")),
            vec!["p1", "g1", "x1"]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dispatch_without_global_only_hits_subsystem() {
        let dir = tempdir().unwrap();
        let mut registry = SinkRegistry::default();
        registry.install(Sink::open("Audio", dir.path().join("Audio.log"), false).unwrap());

        registry.dispatch("Audio", "a1");
        registry.dispatch("Ghost", "lost");
        registry.close_all();

        assert_eq!(lines(&dir.path().join("Audio.log")), vec!["a1"]);
        assert!(!dir.path().join("Global.log").exists());
    }

    #[test]
    fn test_install_replaces_and_closes_previous() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("Renderer.log");
        let second = dir.path().join("Renderer-2.log");
        let mut registry = SinkRegistry::default();

        registry.install(Sink::open("Renderer", &first, false).unwrap());
        registry.dispatch("Renderer", "before");
        registry.install(Sink::open("Renderer", &second, false).unwrap());
        registry.dispatch("Renderer", "after");

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Renderer").unwrap().base_path(), second);
        registry.close_all();

        assert_eq!(lines(&first), vec!["before"]);
        assert_eq!(lines(&second), vec!["after"]);
    }

    #[test]
    fn test_rotation_failure_is_isolated_to_one_sink() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Physics_1.log")).unwrap();

        let mut registry = SinkRegistry::new(8);
        registry.install(Sink::open("Physics", dir.path().join("Physics.log"), false).unwrap());
        registry.install(Sink::open("Audio", dir.path().join("Audio.log"), false).unwrap());

        registry.dispatch("Physics", "0123456789");
        registry.dispatch("Physics", "dropped");
        registry.dispatch("Audio", "ok");

        assert!(!registry.get("Physics").unwrap().is_open());
        assert!(registry.get("Audio").unwrap().is_open());
        registry.close_all();

        assert_eq!(lines(&dir.path().join("Physics.log")), vec!["0123456789"]);
        assert_eq!(lines(&dir.path().join("Audio.log")), vec!["ok"]);
    }
}
