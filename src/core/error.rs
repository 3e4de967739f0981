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

//! Host-facing error type.
//!
//! Every fault the guest CPU can provoke is a MIPS exception routed through
//! COP0 (see `cpu::ExceptionCause`), never an `EmulatorError`. This type only
//! covers failures in constructing or loading the emulator itself, where there
//! is no CPU yet available to take an exception.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Errors surfaced by the host-facing API (construction, loading), as
/// opposed to guest-visible CPU exceptions.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// BIOS file could not be found or read from the given path.
    #[error("BIOS image not found at {0}")]
    BiosNotFound(String),

    /// BIOS file exists but is not the expected 512 KiB image size.
    #[error("invalid BIOS size: expected {expected} bytes, got {got}")]
    InvalidBiosSize { expected: usize, got: usize },

    /// A host-level IO failure while reading a BIOS or config file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
