// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
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

//! Launch configuration for the `psrx-run` binary.
//!
//! Every field is optional: a TOML file only needs to set what it wants to
//! override, and CLI flags always win over the file.

use crate::core::error::{EmulatorError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Process-launch configuration, merged with CLI flags by the binary driver.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub bios_path: Option<PathBuf>,
    pub max_steps: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EmulatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text)
            .map_err(|e| EmulatorError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    /// Fold CLI overrides on top of this config. `None` fields in `self`
    /// keep the override value; `Some` fields in `self` are replaced only
    /// when the override is also `Some`.
    pub fn merge_cli(
        mut self,
        bios_path: Option<PathBuf>,
        max_steps: Option<u64>,
        log_level: Option<String>,
    ) -> Self {
        if bios_path.is_some() {
            self.bios_path = bios_path;
        }
        if max_steps.is_some() {
            self.max_steps = max_steps;
        }
        if log_level.is_some() {
            self.log_level = log_level;
        }
        self
    }
}
