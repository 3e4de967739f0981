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

//! System integration module
//!
//! Ties the CPU interpreter to the memory bus and exposes the run loop
//! the host drives. Graphics, audio, DMA, and disc I/O are not modeled,
//! so there is nothing else to wire up here.

use super::cpu::CPU;
use super::error::Result;
use super::memory::Bus;

/// PlayStation system: a CPU bound to its bus.
///
/// # Components
/// - CPU: MIPS R3000A processor
/// - Bus: memory bus for RAM, BIOS, and stubbed I/O
///
/// # Example
/// ```no_run
/// use psrx::core::system::System;
///
/// let mut system = System::new();
/// system.load_bios("path/to/bios.bin").unwrap();
/// system.step_n(1000).unwrap();
/// ```
pub struct System {
    cpu: CPU,
    bus: Bus,
    /// Total instructions executed since construction or the last reset.
    cycles: u64,
}

impl System {
    /// Create a new System instance with a fresh CPU and a zeroed bus.
    pub fn new() -> Self {
        Self {
            cpu: CPU::new(),
            bus: Bus::new(),
            cycles: 0,
        }
    }

    /// Load BIOS from file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the BIOS file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psrx::core::system::System;
    ///
    /// let mut system = System::new();
    /// system.load_bios("SCPH1001.BIN").unwrap();
    /// ```
    pub fn load_bios(&mut self, path: &str) -> Result<()> {
        self.bus.load_bios(path)
    }

    /// Reset the CPU to its power-on state. RAM and BIOS contents are
    /// untouched; callers that want a full power-cycle should construct a
    /// new `System`.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.cycles = 0;
    }

    /// Execute one CPU instruction.
    ///
    /// # Returns
    /// Number of cycles consumed.
    pub fn step(&mut self) -> Result<u32> {
        let cycles = self.cpu.step(&mut self.bus)?;
        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Execute exactly `n` instructions unless an error occurs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psrx::core::system::System;
    ///
    /// let mut system = System::new();
    /// system.step_n(100).unwrap();
    /// ```
    pub fn step_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    /// Get current PC value.
    ///
    /// # Example
    ///
    /// ```
    /// use psrx::core::system::System;
    ///
    /// let system = System::new();
    /// assert_eq!(system.pc(), 0xBFC00000);
    /// ```
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Get total instructions executed since construction or the last reset.
    ///
    /// # Example
    ///
    /// ```
    /// use psrx::core::system::System;
    ///
    /// let system = System::new();
    /// assert_eq!(system.cycles(), 0);
    /// ```
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Get reference to CPU.
    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    /// Get mutable reference to CPU.
    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    /// Get reference to memory bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Get mutable reference to memory bus.
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}
