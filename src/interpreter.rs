/// # interpreter
///
/// The driver. Owns the machine and talks to the host devices through their
/// traits, so it never knows whether it's drawing to a terminal or a test.
///
/// Each time round the loop:
///
///  1. wait for the clock; it says how many 60Hz ticks are due
///  2. feed any input events to the keypad
///  3. for each due tick, run the steps owed (cpu_hz / 60, with the
///     remainder carried so odd rates come out right over time), then
///     decrement the timers
///  4. draw the frame if it changed, and start/stop the beep on edges of
///     the audio gate
use log::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{FaultPolicy, Settings, TIMER_HZ};
use crate::display::Display;
use crate::error::{Chip8Error, HostError};
use crate::input::{Input, InputEvent};
use crate::machine::Machine;
use crate::sound::Sound;

/// how much work a run got through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// timer ticks
    pub frames: u64,
    pub steps: u64,
}

pub struct Chip8Interpreter<'a> {
    machine: Machine,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    settings: Settings,
    program: Vec<u8>,
    /// steps owed, in 1/60ths
    step_credit: u64,
    beeping: bool,
    summary: RunSummary,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        settings: Settings,
    ) -> Chip8Interpreter<'a> {
        let machine = match settings.seed {
            Some(seed) => Machine::seeded(settings.quirks, seed),
            None => Machine::new(settings.quirks),
        };
        Self::with_machine(machine, display, input, sound, settings)
    }

    pub fn with_machine(
        machine: Machine,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        settings: Settings,
    ) -> Chip8Interpreter<'a> {
        Chip8Interpreter {
            machine,
            display,
            input,
            sound,
            settings,
            program: Vec::new(),
            step_credit: 0,
            beeping: false,
            summary: RunSummary::default(),
        }
    }

    /// load a chip8 program; it's kept so `reset` can reload it
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        self.machine.load_program(program)?;
        self.program = program.to_vec();
        Ok(())
    }

    /// power-cycle the machine and reload the program
    pub fn reset(&mut self) -> Result<(), Chip8Error> {
        self.machine.reset();
        self.step_credit = 0;
        self.machine.load_program(&self.program)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Run until the host quits, the frame limit is hit, or a fault halts
    /// things.
    pub fn main_loop(&mut self, clock: &mut dyn Clock) -> Result<RunSummary, HostError> {
        info!(
            "running at {} instructions/s, {:?}",
            self.settings.cpu_hz, self.settings.fault_policy
        );
        'run: loop {
            let due = clock.wait_for_tick();
            if !self.handle_input()? {
                break;
            }
            for _ in 0..due {
                self.run_tick()?;
                if self.out_of_frames() {
                    self.present()?;
                    break 'run;
                }
            }
            self.present()?;
        }
        info!(
            "stopped after {} frames, {} steps",
            self.summary.frames, self.summary.steps
        );
        Ok(self.summary)
    }

    /// one 60Hz tick: the steps owed, then the timers
    pub fn run_tick(&mut self) -> Result<(), HostError> {
        let per_tick = TIMER_HZ as u64;
        self.step_credit += self.settings.cpu_hz as u64;
        let steps = self.step_credit / per_tick;
        self.step_credit %= per_tick;
        for _ in 0..steps {
            self.step()?;
        }
        self.machine.tick_timers();
        self.summary.frames += 1;
        Ok(())
    }

    fn step(&mut self) -> Result<(), HostError> {
        if let Err(fault) = self.machine.step() {
            match self.settings.fault_policy {
                FaultPolicy::Halt => {
                    debug!("halting: {}", fault);
                    return Err(fault.into());
                }
                FaultPolicy::Log => {
                    warn!("{}; skipping it", fault);
                    self.machine.skip_instruction();
                }
                FaultPolicy::Ignore => self.machine.skip_instruction(),
            }
        }
        self.summary.steps += 1;
        Ok(())
    }

    fn out_of_frames(&self) -> bool {
        self.settings
            .max_frames
            .map_or(false, |max| self.summary.frames >= max)
    }

    /// false if the host wants out
    fn handle_input(&mut self) -> Result<bool, HostError> {
        for event in self.input.poll().map_err(HostError::Input)? {
            match event {
                InputEvent::KeyDown(key) => self.machine.press_key(key),
                InputEvent::KeyUp(key) => self.machine.release_key(key),
                InputEvent::Quit => {
                    info!("quit requested");
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// hand the frame to the display if it changed, and follow the audio gate
    fn present(&mut self) -> Result<(), HostError> {
        if self.machine.take_frame_dirty() {
            self.display
                .draw(self.machine.framebuffer())
                .map_err(HostError::Display)?;
        }
        let gate = self.machine.audio_gate();
        if gate != self.beeping {
            if gate {
                self.sound.beep()?;
            } else {
                self.sound.stop()?;
            }
            self.beeping = gate;
        }
        Ok(())
    }
}
