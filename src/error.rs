use std::error::Error;
use std::fmt;
use std::io;
use thiserror::Error;

/// Everything the core itself can go wrong with. These never escape as
/// panics; the driver decides what to do about them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("program is {size} bytes, but at most 3584 bytes fit above 0x200")]
    LoadTooLarge { size: usize },

    #[error("call stack overflow: 16 subroutines deep")]
    StackOverflow,

    #[error("call stack underflow: return with nothing on the stack")]
    StackUnderflow,

    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("memory access out of range at {0:#06X}")]
    AddressOutOfRange(usize),
}

/// a fault raised by a single step, with enough context for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    /// address of the instruction that faulted
    pub pc: u16,
    /// None if the fetch itself faulted
    pub opcode: Option<u16>,
    pub kind: Chip8Error,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Some(op) => write!(f, "{} (PC {:#05X}, opcode {:#06X})", self.kind, self.pc, op),
            None => write!(f, "{} (PC {:#05X}, fetch)", self.kind, self.pc),
        }
    }
}

// the kind is already in the message, so it isn't reported again as a source
impl Error for Fault {}

/// the sound device couldn't be driven
#[derive(Debug, Error)]
#[error("sound device: {0}")]
pub struct SoundError(pub String);

/// Errors that end a run of the interpreter: either the program faulted and
/// the policy says halt, or one of the host devices failed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Fault(#[from] Fault),

    #[error("display: {0}")]
    Display(#[source] io::Error),

    #[error("input: {0}")]
    Input(#[source] io::Error),

    #[error(transparent)]
    Sound(#[from] SoundError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_diagnostic_has_pc_and_opcode() {
        let f = Fault {
            pc: 0x2a4,
            opcode: Some(0x5121),
            kind: Chip8Error::UnknownOpcode(0x5121),
        };
        let msg = f.to_string();
        assert!(msg.contains("0x2A4"), "{}", msg);
        assert!(msg.contains("0x5121"), "{}", msg);
    }

    #[test]
    fn test_fetch_fault_has_no_opcode() {
        let f = Fault {
            pc: 0xfff,
            opcode: None,
            kind: Chip8Error::AddressOutOfRange(0x1000),
        };
        assert!(f.to_string().contains("fetch"));
        assert!(f.source().is_none());
    }
}
