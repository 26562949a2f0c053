//! # instruction
//!
//! Every CHIP-8 instruction is one big-endian 16-bit word. The top nibble
//! picks the family; within the 0x8, 0xE and 0xF families the low nibble or
//! low byte picks the operation. The remaining bits are operands:
//!
//!  - `_nnn` a 12-bit address
//!  - `_x__` register Vx (or the range V0..=Vx)
//!  - `__y_` register Vy
//!  - `__kk` an 8-bit constant
//!  - `___n` a 4-bit constant
//!
//! Decoding is total: any word that isn't one of the 35 forms decodes to
//! `Invalid`, and it's up to the executor to complain about it.

/// a decoded instruction, with its operands pulled out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 0nnn, machine code routine; ignored
    Sys(u16),
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeImm { x: u8, kk: u8 },
    /// 4xkk
    SneImm { x: u8, kk: u8 },
    /// 5xy0
    SeReg { x: u8, y: u8 },
    /// 6xkk
    LdImm { x: u8, kk: u8 },
    /// 7xkk
    AddImm { x: u8, kk: u8 },
    /// 8xy0
    LdReg { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    Shr { x: u8, y: u8 },
    /// 8xy7
    Subn { x: u8, y: u8 },
    /// 8xyE
    Shl { x: u8, y: u8 },
    /// 9xy0
    SneReg { x: u8, y: u8 },
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd { x: u8, kk: u8 },
    /// Dxyn
    Drw { x: u8, y: u8, n: u8 },
    /// Ex9E
    Skp(u8),
    /// ExA1
    Sknp(u8),
    /// Fx07
    LdVxDt(u8),
    /// Fx0A
    LdVxK(u8),
    /// Fx15
    LdDtVx(u8),
    /// Fx18
    LdStVx(u8),
    /// Fx1E
    AddIVx(u8),
    /// Fx29
    LdFVx(u8),
    /// Fx33
    LdBVx(u8),
    /// Fx55
    StoreRegs(u8),
    /// Fx65
    LoadRegs(u8),
    /// anything else
    Invalid(u16),
}

/// Operand fields of a raw word. Not every field means something for every
/// instruction.
pub trait Opcode {
    /// `[_nnn]`
    fn nnn(&self) -> u16;
    /// `[___n]`
    fn n(&self) -> u8;
    /// `[_x__]`
    fn x(&self) -> u8;
    /// `[__y_]`
    fn y(&self) -> u8;
    /// `[__kk]`
    fn kk(&self) -> u8;
    /// `[o___]`
    fn family(&self) -> u8;
}

impl Opcode for u16 {
    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn x(&self) -> u8 {
        ((self >> 8) & 0x0F) as u8
    }

    fn y(&self) -> u8 {
        ((self >> 4) & 0x0F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn family(&self) -> u8 {
        (self >> 12) as u8
    }
}

impl Instruction {
    pub fn decode(w: u16) -> Self {
        let (x, y) = (w.x(), w.y());
        match w.family() {
            0x0 => match w {
                0x00E0 => Self::Cls,
                0x00EE => Self::Ret,
                _ => Self::Sys(w.nnn()),
            },
            0x1 => Self::Jp(w.nnn()),
            0x2 => Self::Call(w.nnn()),
            0x3 => Self::SeImm { x, kk: w.kk() },
            0x4 => Self::SneImm { x, kk: w.kk() },
            0x5 if w.n() == 0x0 => Self::SeReg { x, y },
            0x6 => Self::LdImm { x, kk: w.kk() },
            0x7 => Self::AddImm { x, kk: w.kk() },
            0x8 => decode_alu(w),
            0x9 if w.n() == 0x0 => Self::SneReg { x, y },
            0xA => Self::LdI(w.nnn()),
            0xB => Self::JpV0(w.nnn()),
            0xC => Self::Rnd { x, kk: w.kk() },
            0xD => Self::Drw { x, y, n: w.n() },
            0xE => match w.kk() {
                0x9E => Self::Skp(x),
                0xA1 => Self::Sknp(x),
                _ => Self::Invalid(w),
            },
            0xF => decode_misc(w),
            _ => Self::Invalid(w),
        }
    }
}

/// 0x8___
fn decode_alu(w: u16) -> Instruction {
    let (x, y) = (w.x(), w.y());
    match w.n() {
        0x0 => Instruction::LdReg { x, y },
        0x1 => Instruction::Or { x, y },
        0x2 => Instruction::And { x, y },
        0x3 => Instruction::Xor { x, y },
        0x4 => Instruction::AddReg { x, y },
        0x5 => Instruction::Sub { x, y },
        0x6 => Instruction::Shr { x, y },
        0x7 => Instruction::Subn { x, y },
        0xE => Instruction::Shl { x, y },
        _ => Instruction::Invalid(w),
    }
}

/// 0xF___
fn decode_misc(w: u16) -> Instruction {
    let x = w.x();
    match w.kk() {
        0x07 => Instruction::LdVxDt(x),
        0x0A => Instruction::LdVxK(x),
        0x15 => Instruction::LdDtVx(x),
        0x18 => Instruction::LdStVx(x),
        0x1E => Instruction::AddIVx(x),
        0x29 => Instruction::LdFVx(x),
        0x33 => Instruction::LdBVx(x),
        0x55 => Instruction::StoreRegs(x),
        0x65 => Instruction::LoadRegs(x),
        _ => Instruction::Invalid(w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Instruction::*;

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.family(), 0xA);
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0xBCD);
    }

    #[test]
    fn test_decode_table() {
        let table = [
            (0x00E0, Cls),
            (0x00EE, Ret),
            (0x0123, Sys(0x123)),
            (0x1ABC, Jp(0xABC)),
            (0x2ABC, Call(0xABC)),
            (0x3A42, SeImm { x: 0xA, kk: 0x42 }),
            (0x4A42, SneImm { x: 0xA, kk: 0x42 }),
            (0x5AB0, SeReg { x: 0xA, y: 0xB }),
            (0x6A42, LdImm { x: 0xA, kk: 0x42 }),
            (0x7A42, AddImm { x: 0xA, kk: 0x42 }),
            (0x8AB0, LdReg { x: 0xA, y: 0xB }),
            (0x8AB1, Or { x: 0xA, y: 0xB }),
            (0x8AB2, And { x: 0xA, y: 0xB }),
            (0x8AB3, Xor { x: 0xA, y: 0xB }),
            (0x8AB4, AddReg { x: 0xA, y: 0xB }),
            (0x8AB5, Sub { x: 0xA, y: 0xB }),
            (0x8AB6, Shr { x: 0xA, y: 0xB }),
            (0x8AB7, Subn { x: 0xA, y: 0xB }),
            (0x8ABE, Shl { x: 0xA, y: 0xB }),
            (0x9AB0, SneReg { x: 0xA, y: 0xB }),
            (0xAABC, LdI(0xABC)),
            (0xBABC, JpV0(0xABC)),
            (0xCA42, Rnd { x: 0xA, kk: 0x42 }),
            (0xDAB5, Drw { x: 0xA, y: 0xB, n: 5 }),
            (0xEA9E, Skp(0xA)),
            (0xEAA1, Sknp(0xA)),
            (0xFA07, LdVxDt(0xA)),
            (0xFA0A, LdVxK(0xA)),
            (0xFA15, LdDtVx(0xA)),
            (0xFA18, LdStVx(0xA)),
            (0xFA1E, AddIVx(0xA)),
            (0xFA29, LdFVx(0xA)),
            (0xFA33, LdBVx(0xA)),
            (0xFA55, StoreRegs(0xA)),
            (0xFA65, LoadRegs(0xA)),
        ];
        for (w, expected) in table {
            assert_eq!(Instruction::decode(w), expected, "{:04X}", w);
        }
    }

    #[test]
    fn test_decode_invalid() {
        for w in [
            0x5AB1, 0x8AB8, 0x8ABF, 0x9AB1, 0xEA9F, 0xEA00, 0xFA00, 0xFAFF, 0xF066,
        ] {
            assert_eq!(Instruction::decode(w), Invalid(w), "{:04X}", w);
        }
    }

    #[test]
    fn test_decode_is_total() {
        // every word decodes to something, and invalid words keep their bits
        for w in 0..=u16::MAX {
            if let Invalid(bits) = Instruction::decode(w) {
                assert_eq!(bits, w);
            }
        }
    }
}
