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

// Lamb Sandbox
// Starts the log service, lets a few fake subsystems log concurrently, shuts down.
//
// Usage: sandbox [config.json]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use lamb_core::{LoggerConfig, Severity, SinkConfig};
use lamb_telemetry::{LogBridge, LogService};

const SUBSYSTEMS: &[&str] = &["Renderer", "Physics", "Audio", "Assets"];

fn default_config() -> LoggerConfig {
    let sinks = std::iter::once("Global")
        .chain(SUBSYSTEMS.iter().copied())
        .map(|subsystem| SinkConfig {
            subsystem: subsystem.to_string(),
            path: format!("logs/{subsystem}.log").into(),
            append: true,
        })
        .collect();
    LoggerConfig {
        sinks,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => LoggerConfig::from_file(path)?,
        None => default_config(),
    };

    let service = LogService::from_config(&config);
    LogBridge::new(service.handle(), config.bridge_level_filter()?)
        .route("sandbox::renderer", "Renderer")
        .route("sandbox::physics", "Physics")
        .install()?;

    log::info!("Sandbox started with {} sinks.", config.sinks.len());

    let producers: Vec<_> = SUBSYSTEMS
        .iter()
        .map(|name| {
            let logger = service.handle().subsystem(*name);
            thread::spawn(move || {
                for frame in 0..5u32 {
                    let severity = match frame {
                        4 => Severity::Error,
                        3 => Severity::Warning,
                        _ => Severity::Info,
                    };
                    logger.log(severity, format!("frame {frame} processed"));
                    thread::sleep(Duration::from_millis(2));
                }
            })
        })
        .collect();

    log::warn!(target: "sandbox::physics", "Solver iteration budget exceeded.");
    log::info!(target: "sandbox::renderer", "Swapchain recreated.");

    for producer in producers {
        if producer.join().is_err() {
            log::error!("A producer thread panicked.");
        }
    }

    log::info!("Sandbox finished.");
    service.shutdown();
    Ok(())
}
