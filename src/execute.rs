//! # execute
//!
//! What each instruction does to the machine. PC has already been moved past
//! the instruction by the time it runs, so skips add 2 and CALL pushes the
//! address of the following instruction.
//!
//! Anything that can fault checks first and mutates after, so a faulting
//! instruction leaves no trace.
use crate::error::Chip8Error;
use crate::framebuffer::{HEIGHT, WIDTH};
use crate::instruction::{Instruction, Opcode};
use crate::machine::{Machine, ADDR_MASK, STACK_DEPTH, VF};
use crate::memory::{Chip8MemoryMap, MemoryMap};

impl Machine {
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            Cls => self.framebuffer.clear(),
            Ret => {
                if self.sp == 0 {
                    return Err(Chip8Error::StackUnderflow);
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp as usize];
            }
            Sys(_) => {}
            Jp(nnn) => self.pc = nnn,
            Call(nnn) => {
                if self.sp as usize >= STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow);
                }
                self.stack[self.sp as usize] = self.pc;
                self.sp += 1;
                self.pc = nnn;
            }
            SeImm { x, kk } => self.skip_if(self.v[x as usize] == kk),
            SneImm { x, kk } => self.skip_if(self.v[x as usize] != kk),
            SeReg { x, y } => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            SneReg { x, y } => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            LdImm { x, kk } => self.v[x as usize] = kk,
            AddImm { x, kk } => self.v[x as usize] = self.v[x as usize].wrapping_add(kk),
            LdReg { x, y } => self.v[x as usize] = self.v[y as usize],
            Or { x, y } => self.logic(x, y, |a, b| a | b),
            And { x, y } => self.logic(x, y, |a, b| a & b),
            Xor { x, y } => self.logic(x, y, |a, b| a ^ b),
            AddReg { x, y } => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.set_with_flag(x, sum, carry as u8);
            }
            Sub { x, y } => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx >= vy) as u8);
            }
            Subn { x, y } => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy >= vx) as u8);
            }
            Shr { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src >> 1, src & 1);
            }
            Shl { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src << 1, (src >> 7) & 1);
            }
            LdI(nnn) => self.i = nnn,
            JpV0(nnn) => {
                let offset = if self.quirks.jump_uses_vx {
                    self.v[nnn.x() as usize]
                } else {
                    self.v[0]
                };
                self.pc = (nnn + offset as u16) & ADDR_MASK;
            }
            Rnd { x, kk } => self.v[x as usize] = self.rng.next_byte() & kk,
            Drw { x, y, n } => self.draw(x, y, n)?,
            Skp(x) => self.skip_if(self.keypad.is_pressed(self.v[x as usize])),
            Sknp(x) => self.skip_if(!self.keypad.is_pressed(self.v[x as usize])),
            LdVxDt(x) => self.v[x as usize] = self.delay_timer,
            LdVxK(x) => self.waiting_for_key = Some(x),
            LdDtVx(x) => self.delay_timer = self.v[x as usize],
            LdStVx(x) => self.sound_timer = self.v[x as usize],
            AddIVx(x) => {
                let sum = self.i as u32 + self.v[x as usize] as u32;
                self.i = sum as u16;
                if self.quirks.index_overflow_sets_vf {
                    self.v[VF] = (sum > ADDR_MASK as u32) as u8;
                }
            }
            LdFVx(x) => self.i = Chip8MemoryMap::font_addr(self.v[x as usize]),
            LdBVx(x) => {
                let value = self.v[x as usize];
                self.memory
                    .write(&[value / 100, value / 10 % 10, value % 10], self.i)?;
            }
            StoreRegs(x) => {
                self.memory.write(&self.v[..=x as usize], self.i)?;
                self.bump_index(x);
            }
            LoadRegs(x) => {
                let src = self.memory.get_ro_slice(self.i, x as usize + 1)?;
                self.v[..=x as usize].copy_from_slice(src);
                self.bump_index(x);
            }
            Invalid(w) => return Err(Chip8Error::UnknownOpcode(w)),
        }
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
        }
    }

    /// the result goes in first, so with x == F the flag is what's left
    fn set_with_flag(&mut self, x: u8, value: u8, flag: u8) {
        self.v[x as usize] = value;
        self.v[VF] = flag;
    }

    fn logic(&mut self, x: u8, y: u8, op: fn(u8, u8) -> u8) {
        self.v[x as usize] = op(self.v[x as usize], self.v[y as usize]);
        if self.quirks.vf_reset {
            self.v[VF] = 0;
        }
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            self.v[y as usize]
        } else {
            self.v[x as usize]
        }
    }

    fn bump_index(&mut self, x: u8) {
        if self.quirks.memory_increments_i {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }

    /// XOR an 8-wide, n-tall sprite from I onto the screen at (Vx, Vy). The
    /// origin wraps; the rest of the sprite clips or wraps depending on the
    /// quirk. VF ends up 1 if any lit pixel got turned off.
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Chip8Error> {
        if n == 0 {
            return Ok(());
        }
        let px = self.v[x as usize] as usize % WIDTH;
        let py = self.v[y as usize] as usize % HEIGHT;
        let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
        let clip = self.quirks.clip_sprites;

        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            let sy = py + row;
            if clip && sy >= HEIGHT {
                break;
            }
            for col in 0..8 {
                if bits & (0x80u8 >> col) == 0 {
                    continue;
                }
                let sx = px + col;
                if clip && sx >= WIDTH {
                    break;
                }
                collision |= self.framebuffer.toggle(sx % WIDTH, sy % HEIGHT);
            }
        }
        self.v[VF] = collision as u8;
        Ok(())
    }
}
