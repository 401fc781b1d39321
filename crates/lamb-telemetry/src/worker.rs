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

//! The single consumer that drains the queue and owns every sink.

use crate::error::SinkError;
use crate::format::{console_line, format_line};
use crate::registry::SinkRegistry;
use crate::service::{LifecycleState, Shared};
use crate::sink::Sink;
use crossbeam_channel::{Receiver, Sender};
use lamb_core::{FormatOptions, Record};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// A message travelling from producers to the worker, in FIFO order.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    /// A record to format and write.
    Record(Record),
    /// A sink opened before the worker started, to take ownership of.
    Install(Sink),
    /// Opens a sink on the worker, in queue order, and reports the outcome.
    Register {
        subsystem: String,
        path: PathBuf,
        append: bool,
        reply: Sender<Result<(), SinkError>>,
    },
    /// New output options, applied to every record queued after this message.
    Configure(FormatOptions),
    /// Stop after writing everything that is still queued.
    Shutdown,
}

/// Drains [`WorkerMessage`]s on a dedicated thread.
pub(crate) struct Worker {
    rx: Receiver<WorkerMessage>,
    registry: SinkRegistry,
    options: FormatOptions,
    console: Box<dyn Write + Send>,
    shared: Arc<Shared>,
    records_written: u64,
}

impl Worker {
    pub(crate) fn new(
        rx: Receiver<WorkerMessage>,
        registry: SinkRegistry,
        console: Box<dyn Write + Send>,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            rx,
            registry,
            options: FormatOptions::default(),
            console,
            shared,
            records_written: 0,
        }
    }

    /// Runs until a shutdown request has been seen and the queue is empty.
    ///
    /// Returns the registry so the caller can close the sinks once the
    /// thread has been joined.
    pub(crate) fn run(mut self) -> SinkRegistry {
        log::debug!("Log worker started.");

        // `recv` parks the thread until a message arrives. A disconnected
        // channel means every producer is gone, which is treated as shutdown.
        while let Ok(message) = self.rx.recv() {
            if matches!(message, WorkerMessage::Shutdown) {
                break;
            }
            self.handle(message);
        }

        self.shared.set_state(LifecycleState::Draining);
        while let Ok(message) = self.rx.try_recv() {
            if !matches!(message, WorkerMessage::Shutdown) {
                self.handle(message);
            }
        }
        let _ = self.console.flush();
        self.shared.set_state(LifecycleState::Stopped);

        log::debug!(
            "Log worker stopped after writing {} records.",
            self.records_written
        );
        self.registry
    }

    fn handle(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Record(record) => self.write(&record),
            WorkerMessage::Install(sink) => self.registry.install(sink),
            WorkerMessage::Register {
                subsystem,
                path,
                append,
                reply,
            } => {
                let result =
                    Sink::open(subsystem, path, append).map(|sink| self.registry.install(sink));
                // Only fails if the caller is gone.
                let _ = reply.send(result);
            }
            WorkerMessage::Configure(options) => self.options = options,
            WorkerMessage::Shutdown => {}
        }
    }

    fn write(&mut self, record: &Record) {
        let line = format_line(record, self.options.structured);

        if self.options.console {
            let decorated = console_line(record.severity(), &line, &self.options);
            let _ = writeln!(self.console, "{decorated}");
        }

        self.registry.dispatch(record.subsystem(), &line);
        self.records_written += 1;
    }
}
