use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the address space. Every access is range-checked; nothing
/// outside 0x000..=0xFFF exists, so asking for it is an error rather than a
/// silent wrap.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        let bytes = self.get_rw_slice(addr, data.len())?;
        bytes.copy_from_slice(data);
        Ok(())
    }

    /// get a two-byte big-endian word (opcodes)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// the largest program that fits between 0x200 and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the hex digit sprites live
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map:
///   0x000-0x04f  unused
///   0x050-0x09f  font
///   0x0a0-0x1ff  unused
///   0x200-0xfff  program
///
/// the stack, registers and display live outside of addressable memory
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = check_range(addr, len)?;
        Ok(&mut self.bytes[a..(a + len)])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = check_range(addr, len)?;
        Ok(&self.bytes[a..(a + len)])
    }
}

/// the first address of addr..addr+len that falls off the end, if any
fn check_range(addr: u16, len: usize) -> Result<usize, Chip8Error> {
    let a = addr as usize;
    if a + len > CHIP8_RAM_SIZE_BYTES {
        Err(Chip8Error::AddressOutOfRange(a.max(CHIP8_RAM_SIZE_BYTES)))
    } else {
        Ok(a)
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: Box::new([0u8; CHIP8_RAM_SIZE_BYTES]),
        };
        mm.load_font();
        mm
    }

    /// zero everything and put the font back
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.load_font();
    }

    fn load_font(&mut self) {
        let start = CHIP8_FONT_ADDR as usize;
        self.bytes[start..start + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// Load a CHIP-8 program at 0x200. Whatever was in the program region
    /// before is cleared, so a short program never runs into the tail of a
    /// longer one.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::LoadTooLarge {
                size: program.len(),
            });
        }
        let start = CHIP8_PROGRAM_ADDR as usize;
        self.bytes[start..].fill(0);
        self.write(program, CHIP8_PROGRAM_ADDR)
    }

    /// address of the sprite for a hex digit; only the low nibble counts
    pub fn font_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + CHIP8_FONT_GLYPH_BYTES * (digit & 0x0f) as u16
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
