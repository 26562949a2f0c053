use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::debug;

use chip8vm::clock::SpinClock;
use chip8vm::config::{DEFAULT_CPU_HZ, MAX_CPU_HZ};
use chip8vm::display::MonoTermDisplay;
use chip8vm::input::StdinInput;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{Chip8Interpreter, FaultPolicy, HostError, Quirks, Settings};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnFault {
    Halt,
    Log,
    Ignore,
}

impl From<OnFault> for FaultPolicy {
    fn from(f: OnFault) -> Self {
        match f {
            OnFault::Halt => FaultPolicy::Halt,
            OnFault::Log => FaultPolicy::Log,
            OnFault::Ignore => FaultPolicy::Ignore,
        }
    }
}

/// Run a CHIP-8 program in the terminal. Esc quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// program to load at 0x200
    rom: PathBuf,

    #[arg(
        long,
        default_value_t = DEFAULT_CPU_HZ,
        value_parser = clap::value_parser!(u32).range(1..=MAX_CPU_HZ as i64),
        help = "Instructions per second"
    )]
    cpu_hz: u32,

    #[arg(long, help = "Seed the random number generator")]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OnFault::Halt)]
    on_fault: OnFault,

    #[arg(long, help = "8xy1/8xy2/8xy3 leave VF alone")]
    no_vf_reset: bool,

    #[arg(long, help = "8xy6/8xyE shift Vx in place")]
    no_shift_vy: bool,

    #[arg(long, help = "Fx55/Fx65 leave I unchanged")]
    no_memory_increment: bool,

    #[arg(long, help = "Sprites wrap at the screen edges")]
    wrap_sprites: bool,

    #[arg(long, help = "Bnnn jumps to nnn + Vx")]
    jump_vx: bool,

    #[arg(long, help = "Fx1E sets VF when I overflows")]
    index_overflow_vf: bool,

    #[arg(long, default_value_t = 100, help = "How long a key press is held, in ms")]
    key_hold_ms: u64,

    #[arg(long, help = "Stop after this many 60Hz frames")]
    max_frames: Option<u64>,

    #[arg(long, help = "No sound")]
    mute: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            quirks: Quirks {
                vf_reset: !self.no_vf_reset,
                shift_uses_vy: !self.no_shift_vy,
                memory_increments_i: !self.no_memory_increment,
                clip_sprites: !self.wrap_sprites,
                jump_uses_vx: self.jump_vx,
                index_overflow_sets_vf: self.index_overflow_vf,
            },
            cpu_hz: self.cpu_hz,
            fault_policy: self.on_fault.into(),
            key_hold: Duration::from_millis(self.key_hold_ms),
            max_frames: self.max_frames,
            seed: self.seed,
        }
    }
}

fn run(program: &[u8], settings: Settings, mute: bool) -> anyhow::Result<()> {
    let mut display = MonoTermDisplay::new().context("couldn't set up the terminal")?;
    let mut input = StdinInput::new(settings.key_hold).context("couldn't set up the keyboard")?;
    let mut sound: Box<dyn Sound> = if mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };
    let mut clock = SpinClock::new(settings.timer_period());

    let mut interpreter =
        Chip8Interpreter::new(&mut display, &mut input, sound.as_mut(), settings);
    interpreter.load_program(program)?;
    let summary = interpreter.main_loop(&mut clock)?;
    debug!("{:?}", summary);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let program = fs::read(&args.rom)
        .with_context(|| format!("couldn't read {}", args.rom.display()))?;

    // the devices are gone by the time this returns, so the terminal is back
    if let Err(e) = run(&program, args.settings(), args.mute) {
        if let Some(HostError::Fault(fault)) = e.downcast_ref::<HostError>() {
            eprintln!("fault: {}", fault);
            process::exit(1);
        }
        return Err(e);
    }
    Ok(())
}
