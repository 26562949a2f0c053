use std::time::Duration;

/// Switches for the instructions whose behaviour differs between historical
/// interpreters. The defaults are the original COSMAC VIP behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy1/8xy2/8xy3 zero VF afterwards
    pub vf_reset: bool,
    /// 8xy6/8xyE shift Vy into Vx rather than shifting Vx in place
    pub shift_uses_vy: bool,
    /// Fx55/Fx65 leave I pointing past the last register transferred
    pub memory_increments_i: bool,
    /// Dxyn drops pixels past the right and bottom edges instead of wrapping
    pub clip_sprites: bool,
    /// Bnnn jumps to nnn + Vx (x being the top nibble of nnn), not nnn + V0
    pub jump_uses_vx: bool,
    /// Fx1E sets VF when I runs past 0xFFF, and clears it otherwise
    pub index_overflow_sets_vf: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            vf_reset: true,
            shift_uses_vy: true,
            memory_increments_i: true,
            clip_sprites: true,
            jump_uses_vx: false,
            index_overflow_sets_vf: false,
        }
    }
}

/// what the driver does when a step faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// stop the run and hand the fault back
    #[default]
    Halt,
    /// log it and carry on with the next instruction
    Log,
    /// treat the instruction as a no-op
    Ignore,
}

/// timers always run at this rate
pub const TIMER_HZ: u32 = 60;

/// default instruction rate; ten steps per timer tick
pub const DEFAULT_CPU_HZ: u32 = 600;

/// fastest rate the command line will take
pub const MAX_CPU_HZ: u32 = 1_000_000;

/// everything the driver needs to know that isn't the program itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub quirks: Quirks,
    pub cpu_hz: u32,
    pub fault_policy: FaultPolicy,
    /// how long a key stays down after a terminal reports it
    pub key_hold: Duration,
    /// stop after this many timer ticks
    pub max_frames: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quirks: Quirks::default(),
            cpu_hz: DEFAULT_CPU_HZ,
            fault_policy: FaultPolicy::default(),
            key_hold: Duration::from_millis(100),
            max_frames: None,
            seed: None,
        }
    }
}

impl Settings {
    pub fn timer_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64)
    }
}
