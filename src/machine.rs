//! # machine
//!
//! Everything a CHIP-8 program can see, plus the operations a host uses to
//! drive it. A step is a closed transaction: either the whole instruction
//! happens, or it faults and the machine is left exactly as it was (bar the
//! first key-press edge on the keypad, which every step takes).
use std::fmt;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::Quirks;
use crate::error::{Chip8Error, Fault};
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_PROGRAM_ADDR};

/// how many return addresses fit on the call stack
pub const STACK_DEPTH: usize = 16;

/// PC and stack entries are 12 bits
pub const ADDR_MASK: u16 = 0x0FFF;

/// the flag register
pub const VF: usize = 0xF;

/// where Cxkk gets its randomness from
pub trait RandomSource {
    fn next_byte(&mut self) -> u8;
}

impl<R: RngCore> RandomSource for R {
    fn next_byte(&mut self) -> u8 {
        (self.next_u32() & 0xff) as u8
    }
}

pub struct Machine {
    pub(crate) memory: Chip8MemoryMap,
    pub(crate) v: [u8; 16],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) sp: u8,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) keypad: Keypad,
    pub(crate) framebuffer: FrameBuffer,
    /// register Fx0A is waiting to fill
    pub(crate) waiting_for_key: Option<u8>,
    pub(crate) quirks: Quirks,
    pub(crate) rng: Box<dyn RandomSource>,
}

impl Machine {
    /// a machine with an entropy-seeded random source
    pub fn new(quirks: Quirks) -> Self {
        Self::with_rng(quirks, StdRng::from_entropy())
    }

    /// same seed, same Cxkk results
    pub fn seeded(quirks: Quirks, seed: u64) -> Self {
        Self::with_rng(quirks, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(quirks: Quirks, rng: impl RandomSource + 'static) -> Self {
        debug!("new machine with {:?}", quirks);
        Machine {
            memory: Chip8MemoryMap::new(),
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            framebuffer: FrameBuffer::new(),
            waiting_for_key: None,
            quirks,
            rng: Box::new(rng),
        }
    }

    /// Zero all state and reload the font. Quirks and the random source are
    /// kept; the program has to be loaded again.
    pub fn reset(&mut self) {
        debug!("reset");
        self.memory.reset();
        self.v = [0; 16];
        self.i = 0;
        self.pc = CHIP8_PROGRAM_ADDR;
        self.sp = 0;
        self.stack = [0; STACK_DEPTH];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keypad.reset();
        self.framebuffer.clear();
        self.waiting_for_key = None;
    }

    /// put a program at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.memory.load_program(program)?;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    pub fn press_key(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn release_key(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Run one cycle. If Fx0A is waiting on a key this either resolves the
    /// wait from a fresh key press or does nothing; otherwise it fetches,
    /// advances PC past the instruction, and executes it.
    pub fn step(&mut self) -> Result<(), Fault> {
        let edge = self.keypad.take_first_edge();
        if let Some(x) = self.waiting_for_key {
            if let Some(key) = edge {
                debug!("V{:X} <- key {:X}", x, key);
                self.v[x as usize] = key;
                self.waiting_for_key = None;
            }
            return Ok(());
        }

        let pc = self.pc;
        let opcode = self.memory.get_word(pc).map_err(|kind| Fault {
            pc,
            opcode: None,
            kind,
        })?;
        self.pc = pc.wrapping_add(2) & ADDR_MASK;

        let instruction = Instruction::decode(opcode);
        trace!("{:03X}: {:04X} {:?}", pc, opcode, instruction);
        self.execute(instruction).map_err(|kind| {
            self.pc = pc;
            Fault {
                pc,
                opcode: Some(opcode),
                kind,
            }
        })
    }

    /// step over the instruction at PC without running it
    pub fn skip_instruction(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
    }

    /// one 60Hz tick
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// the sound device should be making a noise
    pub fn audio_gate(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// has the framebuffer changed since last asked
    pub fn take_frame_dirty(&mut self) -> bool {
        self.framebuffer.take_dirty()
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// the live part of the call stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn waiting_for_key(&self) -> Option<u8> {
        self.waiting_for_key
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("pc", &format_args!("{:#05X}", self.pc))
            .field("i", &format_args!("{:#06X}", self.i))
            .field("v", &self.v)
            .field("sp", &self.sp)
            .field("stack", &self.stack())
            .field("delay_timer", &self.delay_timer)
            .field("sound_timer", &self.sound_timer)
            .field("waiting_for_key", &self.waiting_for_key)
            .field("quirks", &self.quirks)
            .finish()
    }
}
