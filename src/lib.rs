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

//! psrx: a MIPS R3000A interpreter for the PlayStation 1 CPU core.
//!
//! This crate emulates the CPU and memory bus only — the register file, the
//! load/branch delay slots, COP0 exception handling, and address
//! translation. Graphics, audio, DMA, and disc I/O are not modeled; the bus
//! stubs their registers so BIOS and game code that merely pokes them keeps
//! running.
//!
//! # Example
//!
//! ```no_run
//! use psrx::core::system::System;
//!
//! let mut system = System::new();
//! system.load_bios("path/to/bios.bin")?;
//! system.step()?;
//! # Ok::<(), psrx::core::error::EmulatorError>(())
//! ```
//!
//! # Modules
//!
//! - [`core::cpu`]: MIPS R3000A interpreter
//! - [`core::memory`]: memory bus and address translation
//! - [`core::system`]: ties the CPU and bus together behind a `step` loop
//!
//! # Error Handling
//!
//! All fallible operations return [`core::error::Result<T>`], an alias for
//! `Result<T, EmulatorError>`. `EmulatorError` only covers construction-time
//! failures (bad BIOS image, missing file); guest-visible faults are MIPS
//! exceptions handled internally by the CPU.

pub mod config;
pub mod core;

// Re-export commonly used types
pub use core::error::{EmulatorError, Result};
