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

//! Lifecycle controller and producer API of the logging service.
//!
//! A [`LogService`] is created once at process startup and owned by the code
//! that starts and stops the engine. Everything else receives a cloneable
//! [`LogHandle`] and only ever enqueues records: formatting and file I/O
//! happen on the service's worker thread.
//!
//! ```no_run
//! use lamb_core::{FormatOptions, Severity};
//! use lamb_telemetry::{LogService, ServiceConfig};
//!
//! let service = LogService::new(ServiceConfig::default());
//! service.register_sink("Global", "logs/Global.log", true);
//! service.register_sink("Physics", "logs/Physics.log", true);
//! service.init(FormatOptions::default());
//!
//! let physics = service.handle().subsystem("Physics");
//! physics.error("boom");
//!
//! service.shutdown();
//! ```

use crate::registry::SinkRegistry;
use crate::sink::Sink;
use crate::worker::{Worker, WorkerMessage};
use crossbeam_channel::{Receiver, Sender};
use lamb_core::{
    FormatOptions, LoggerConfig, Record, Severity, DEFAULT_ROTATION_THRESHOLD, DEFAULT_SUBSYSTEM,
};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Where the service is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// Created, worker not started. Records are dropped.
    Uninitialized = 0,
    /// Worker running, records are accepted.
    Running = 1,
    /// Shutdown requested, the worker is writing what is left in the queue.
    Draining = 2,
    /// Worker finished. Records are dropped.
    Stopped = 3,
}

impl LifecycleState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Uninitialized,
            1 => LifecycleState::Running,
            2 => LifecycleState::Draining,
            _ => LifecycleState::Stopped,
        }
    }
}

/// State read on every producer call, hence atomics rather than a lock.
#[derive(Debug)]
pub(crate) struct Shared {
    state: AtomicU8,
    enabled: AtomicBool,
}

impl Shared {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
            enabled: AtomicBool::new(enabled),
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: LifecycleState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Configuration for the log service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// When false, every producer call returns after a single atomic load.
    pub enabled: bool,
    /// Size in bytes at which a sink's file is rotated.
    pub rotation_threshold: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotation_threshold: DEFAULT_ROTATION_THRESHOLD,
        }
    }
}

impl From<&LoggerConfig> for ServiceConfig {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            enabled: config.enabled,
            rotation_threshold: config.rotation_threshold,
        }
    }
}

/// Cloneable producer handle.
///
/// Calls never block on I/O and never fail: a record that cannot be queued
/// (service disabled, not started, or stopped) is silently dropped.
#[derive(Debug, Clone)]
pub struct LogHandle {
    tx: Sender<WorkerMessage>,
    shared: Arc<Shared>,
}

impl LogHandle {
    /// Queues a record for `subsystem`.
    pub fn log(&self, severity: Severity, message: impl Into<String>, subsystem: impl Into<String>) {
        if !self.shared.enabled.load(Ordering::Relaxed) {
            return;
        }
        if self.shared.state() != LifecycleState::Running {
            return;
        }
        let record = Record::new(severity, subsystem, message);
        // Only fails once the worker is gone, in which case the record is dropped.
        let _ = self.tx.send(WorkerMessage::Record(record));
    }

    /// Queues an info record for the default subsystem.
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message, DEFAULT_SUBSYSTEM);
    }

    /// Queues a warning record for the default subsystem.
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message, DEFAULT_SUBSYSTEM);
    }

    /// Queues an error record for the default subsystem.
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message, DEFAULT_SUBSYSTEM);
    }

    /// Returns a logger bound to one subsystem.
    pub fn subsystem(&self, name: impl Into<String>) -> SubsystemLogger {
        SubsystemLogger {
            handle: self.clone(),
            name: name.into(),
        }
    }

    /// Returns true if records would currently be accepted.
    pub fn is_accepting(&self) -> bool {
        self.shared.enabled.load(Ordering::Relaxed)
            && self.shared.state() == LifecycleState::Running
    }
}

/// A [`LogHandle`] bound to a fixed subsystem, for components that always
/// log under the same tag.
#[derive(Debug, Clone)]
pub struct SubsystemLogger {
    handle: LogHandle,
    name: String,
}

impl SubsystemLogger {
    /// Queues a record with the given severity.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.handle.log(severity, message, self.name.as_str());
    }

    /// Queues an info record.
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    /// Queues a warning record.
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    /// Queues an error record.
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// The subsystem this logger writes under.
    pub fn name(&self) -> &str {
        &self.name
    }
}

struct Lifecycle {
    rx: Option<Receiver<WorkerMessage>>,
    console: Option<Box<dyn Write + Send>>,
    worker: Option<JoinHandle<SinkRegistry>>,
}

/// The logging service: owns the queue, the worker thread and, through the
/// worker, every sink.
pub struct LogService {
    config: ServiceConfig,
    handle: LogHandle,
    lifecycle: Mutex<Lifecycle>,
}

impl LogService {
    /// Creates a service that mirrors to standard output when asked to.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_console(config, std::io::stdout())
    }

    /// Creates a service whose console mirror writes to `console`.
    pub fn with_console(config: ServiceConfig, console: impl Write + Send + 'static) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let shared = Arc::new(Shared::new(config.enabled));
        Self {
            config,
            handle: LogHandle { tx, shared },
            lifecycle: Mutex::new(Lifecycle {
                rx: Some(rx),
                console: Some(Box::new(console)),
                worker: None,
            }),
        }
    }

    /// Builds a running service from a loaded configuration: registers every
    /// configured sink, then initializes with the configured options.
    pub fn from_config(config: &LoggerConfig) -> Self {
        let service = Self::new(ServiceConfig::from(config));
        for sink in &config.sinks {
            service.register_sink(&sink.subsystem, &sink.path, sink.append);
        }
        service.init(config.format_options());
        service
    }

    /// Starts the worker on the first call; every call installs `options`.
    ///
    /// New options apply to records queued after this call returns. Records
    /// already queued keep the options that were current when they were queued.
    /// Calling this after [`shutdown`](Self::shutdown) does nothing.
    pub fn init(&self, options: FormatOptions) {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);

        match self.state() {
            LifecycleState::Draining | LifecycleState::Stopped => {
                log::warn!("Log service init ignored: the service has been shut down.");
                return;
            }
            LifecycleState::Running => {
                let _ = self.handle.tx.send(WorkerMessage::Configure(options));
                log::debug!("Log service reconfigured: {options:?}");
                return;
            }
            LifecycleState::Uninitialized => {}
        }

        let _ = self.handle.tx.send(WorkerMessage::Configure(options));

        let (Some(rx), Some(console)) = (lifecycle.rx.take(), lifecycle.console.take()) else {
            return;
        };
        let worker = Worker::new(
            rx,
            SinkRegistry::new(self.config.rotation_threshold),
            console,
            Arc::clone(&self.handle.shared),
        );

        match thread::Builder::new()
            .name("lamb-log-worker".into())
            .spawn(move || worker.run())
        {
            Ok(handle) => {
                lifecycle.worker = Some(handle);
                self.handle.shared.set_state(LifecycleState::Running);
                log::info!("Log service started: {options:?}");
            }
            Err(err) => {
                eprintln!("[LOGGER] Failed to start log worker: {err}");
                self.handle.shared.set_state(LifecycleState::Stopped);
            }
        }
    }

    /// Opens the file for `subsystem` and routes its records there.
    ///
    /// Missing parent directories are created. On failure the error is
    /// printed to stderr, nothing is registered and `false` is returned; the
    /// subsystem's records then only reach the global sink, if any.
    /// Registering a subsystem again closes its previous file.
    ///
    /// Once the service is running the file is opened by the worker, after
    /// every record already queued, and this call blocks until it is done.
    pub fn register_sink(
        &self,
        subsystem: &str,
        path: impl AsRef<Path>,
        append: bool,
    ) -> bool {
        let path = path.as_ref();
        // Held across the whole call so shutdown cannot stop the worker
        // between the request and its installation.
        let _lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);

        let result = match self.state() {
            LifecycleState::Draining | LifecycleState::Stopped => return false,
            LifecycleState::Uninitialized => Sink::open(subsystem, path, append).map(|sink| {
                // No worker yet, so nothing can be writing to this file.
                let _ = self.handle.tx.send(WorkerMessage::Install(sink));
            }),
            LifecycleState::Running => {
                let (reply, response) = crossbeam_channel::bounded(1);
                let request = WorkerMessage::Register {
                    subsystem: subsystem.to_string(),
                    path: path.to_path_buf(),
                    append,
                    reply,
                };
                if self.handle.tx.send(request).is_err() {
                    return false;
                }
                match response.recv() {
                    Ok(result) => result,
                    Err(_) => return false,
                }
            }
        };

        match result {
            Ok(()) => {
                log::debug!("Registered sink '{subsystem}' at {}", path.display());
                true
            }
            Err(err) => {
                eprintln!(
                    "[LOGGER] Failed to open log file for subsystem '{subsystem}': {} ({err})",
                    path.display()
                );
                false
            }
        }
    }

    /// Writes every queued record, stops the worker and closes all sinks.
    ///
    /// Blocks until the queue is drained. Only the first call after
    /// [`init`](Self::init) does anything.
    pub fn shutdown(&self) {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);

        match self.state() {
            LifecycleState::Running => {}
            LifecycleState::Uninitialized => {
                self.handle.shared.set_state(LifecycleState::Stopped);
                // Sinks registered before init are closed with the queue.
                lifecycle.rx = None;
                return;
            }
            LifecycleState::Draining | LifecycleState::Stopped => return,
        }

        self.handle.shared.set_state(LifecycleState::Draining);
        let _ = self.handle.tx.send(WorkerMessage::Shutdown);

        if let Some(worker) = lifecycle.worker.take() {
            match worker.join() {
                Ok(mut registry) => registry.close_all(),
                Err(_) => eprintln!("[LOGGER] Log worker panicked during shutdown."),
            }
        }
        self.handle.shared.set_state(LifecycleState::Stopped);
        log::info!("Log service stopped.");
    }

    /// Queues a record for `subsystem`. See [`LogHandle::log`].
    pub fn log(&self, severity: Severity, message: impl Into<String>, subsystem: impl Into<String>) {
        self.handle.log(severity, message, subsystem);
    }

    /// Returns a producer handle that can be cloned into other threads.
    pub fn handle(&self) -> LogHandle {
        self.handle.clone()
    }

    /// Turns record production on or off at runtime.
    pub fn set_enabled(&self, enabled: bool) {
        self.handle.shared.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether record production is on.
    pub fn is_enabled(&self) -> bool {
        self.handle.shared.enabled.load(Ordering::Relaxed)
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.handle.shared.state()
    }
}

impl Drop for LogService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
