//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the machine is a plain value: memory, registers, stack, timers,
//!   keypad and framebuffer, and nothing else. It has no idea about wall
//!   clocks, terminals or speakers
//! * one `step()` is one instruction, and either completes or faults with
//!   the machine left exactly as it was (apart from the PC pointing at the
//!   offending instruction)
//! * the quirks that differ between historical interpreters are switches,
//!   defaulting to the COSMAC VIP
//! * display, input and sound are traits, so the driver can be pointed at a
//!   terminal or at dummies in tests
//! * the driver owns pacing: the timers run at 60Hz and the CPU runs at
//!   whatever rate it's told, in whole steps per timer tick
//!
//! Model
//!
//! main
//!  |-- settings (clap), logging (env_logger)
//!  |-- display, input, sound, clock
//!  `-- interpreter(display, input, sound, settings)
//!       |-- machine(quirks, rng)
//!       |    |-- memory map, keypad, framebuffer
//!       |    `-- decode -> execute
//!       `-- main loop
//!            |-- due = clock.wait_for_tick()
//!            |-- input -> keypad
//!            |-- due * (cpu_hz / 60 steps, then tick timers)
//!            `-- draw if dirty; beep on audio gate edges
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
mod execute;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod machine;
pub mod memory;
pub mod sound;

pub use config::{FaultPolicy, Quirks, Settings};
pub use error::{Chip8Error, Fault, HostError};
pub use instruction::Instruction;
pub use interpreter::{Chip8Interpreter, RunSummary};
pub use machine::{Machine, RandomSource};
