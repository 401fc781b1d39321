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

//! The `log` facade routed through an installed bridge.
//!
//! Installing a global logger is once per process, so this file holds a
//! single test.

use anyhow::Result;
use lamb_core::FormatOptions;
use lamb_telemetry::{LogBridge, LogService, ServiceConfig};
use log::LevelFilter;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_log_macros_reach_routed_sinks() -> Result<()> {
    let dir = tempdir()?;
    let service = LogService::with_console(ServiceConfig::default(), std::io::sink());
    service.register_sink("Global", dir.path().join("Global.log"), false);
    service.register_sink("Physics", dir.path().join("Physics.log"), false);
    service.init(FormatOptions::new(false, false, false));

    LogBridge::new(service.handle(), LevelFilter::Info)
        .with_default_subsystem("Engine")
        .route("game::physics", "Physics")
        .install()?;

    log::warn!(target: "game::physics::broadphase", "pair cache full");
    log::info!(target: "game::ai", "path found");
    log::debug!(target: "game::physics", "filtered");
    service.shutdown();

    let physics = fs::read_to_string(dir.path().join("Physics.log"))?;
    let global = fs::read_to_string(dir.path().join("Global.log"))?;

    let physics: Vec<_> = physics.lines().collect();
    assert_eq!(physics.len(), 1);
    assert!(physics[0].ends_with("[Physics] [WARN] pair cache full"));

    let global: Vec<_> = global.lines().collect();
    assert_eq!(global.len(), 2);
    assert!(global[1].ends_with("[Engine] [INFO] path found"));
    Ok(())
}
