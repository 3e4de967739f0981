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

//! Load and store instructions.
//!
//! These are the only instructions that touch data memory. Loads write
//! through the load delay slot; stores are immediate. When the Status
//! Register's cache-isolation bit is set, the bus is never called: loads
//! deliver zero and stores are dropped, matching how the BIOS probes RAM
//! with cache isolated before it trusts the bus underneath it.

use super::super::cop0::COP0;
use super::super::decode::decode_i_type;
use super::super::{ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::memory::Bus;

impl CPU {
    fn cache_isolated(&self) -> bool {
        self.cop0.regs[COP0::SR] & (1 << 16) != 0
    }

    fn effective_address(&self, instruction: u32) -> (u8, u32) {
        let (_, rs, rt, imm) = decode_i_type(instruction);
        let offset = (imm as i16) as i32;
        (rt, self.reg(rs).wrapping_add(offset as u32))
    }

    /// LB: Load Byte, sign-extended, into the load delay slot.
    pub(crate) fn op_lb(&mut self, instruction: u32, bus: &Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            self.set_reg_delayed(rt, 0);
            return Ok(());
        }
        match bus.read8(addr) {
            Ok(value) => self.set_reg_delayed(rt, (value as i8) as i32 as u32),
            Err(_) => self.exception(ExceptionCause::AddressErrorLoad),
        }
        Ok(())
    }

    /// LBU: Load Byte Unsigned, zero-extended, into the load delay slot.
    pub(crate) fn op_lbu(&mut self, instruction: u32, bus: &Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            self.set_reg_delayed(rt, 0);
            return Ok(());
        }
        match bus.read8(addr) {
            Ok(value) => self.set_reg_delayed(rt, value as u32),
            Err(_) => self.exception(ExceptionCause::AddressErrorLoad),
        }
        Ok(())
    }

    /// LH: Load Halfword, sign-extended, into the load delay slot.
    pub(crate) fn op_lh(&mut self, instruction: u32, bus: &Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            self.set_reg_delayed(rt, 0);
            return Ok(());
        }
        match bus.read16(addr) {
            Ok(value) => self.set_reg_delayed(rt, (value as i16) as i32 as u32),
            Err(_) => self.exception(ExceptionCause::AddressErrorLoad),
        }
        Ok(())
    }

    /// LHU: Load Halfword Unsigned, zero-extended, into the load delay slot.
    pub(crate) fn op_lhu(&mut self, instruction: u32, bus: &Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            self.set_reg_delayed(rt, 0);
            return Ok(());
        }
        match bus.read16(addr) {
            Ok(value) => self.set_reg_delayed(rt, value as u32),
            Err(_) => self.exception(ExceptionCause::AddressErrorLoad),
        }
        Ok(())
    }

    /// LW: Load Word into the load delay slot.
    pub(crate) fn op_lw(&mut self, instruction: u32, bus: &Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            self.set_reg_delayed(rt, 0);
            return Ok(());
        }
        match bus.read32(addr) {
            Ok(value) => self.set_reg_delayed(rt, value),
            Err(_) => self.exception(ExceptionCause::AddressErrorLoad),
        }
        Ok(())
    }

    /// SB: Store Byte.
    pub(crate) fn op_sb(&mut self, instruction: u32, bus: &mut Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            log::trace!("store suppressed by cache isolation at 0x{addr:08X}");
            return Ok(());
        }
        let value = self.reg(rt) as u8;
        if bus.write8(addr, value).is_err() {
            self.exception(ExceptionCause::AddressErrorStore);
        }
        Ok(())
    }

    /// SH: Store Halfword.
    pub(crate) fn op_sh(&mut self, instruction: u32, bus: &mut Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            log::trace!("store suppressed by cache isolation at 0x{addr:08X}");
            return Ok(());
        }
        let value = self.reg(rt) as u16;
        if bus.write16(addr, value).is_err() {
            self.exception(ExceptionCause::AddressErrorStore);
        }
        Ok(())
    }

    /// SW: Store Word.
    pub(crate) fn op_sw(&mut self, instruction: u32, bus: &mut Bus) -> Result<()> {
        let (rt, addr) = self.effective_address(instruction);
        if self.cache_isolated() {
            log::trace!("store suppressed by cache isolation at 0x{addr:08X}");
            return Ok(());
        }
        let value = self.reg(rt);
        if bus.write32(addr, value).is_err() {
            self.exception(ExceptionCause::AddressErrorStore);
        }
        Ok(())
    }
}
