pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// how many bytes the packed pixel plane takes
pub const FRAME_BYTES: usize = WIDTH * HEIGHT / 8;

/// The 64x32 monochrome pixel plane, packed row-major, 8 pixels per byte,
/// most significant bit leftmost. That's the same layout the COSMAC kept in
/// its display page, and the layout renderers get handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bits: [u8; FRAME_BYTES],
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            bits: [0; FRAME_BYTES],
            dirty: true,
        }
    }
}

/// coordinates off the edge wrap round to the other side
#[inline]
fn locate(x: usize, y: usize) -> (usize, u8) {
    let n = (y % HEIGHT) * WIDTH + x % WIDTH;
    (n / 8, 0x80 >> (n % 8))
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// is the pixel at column x, row y lit
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = locate(x, y);
        self.bits[byte] & mask != 0
    }

    /// flip a pixel, returning whether it was lit beforehand
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let (byte, mask) = locate(x, y);
        let was = self.bits[byte] & mask != 0;
        self.bits[byte] ^= mask;
        self.dirty = true;
        was
    }

    pub fn clear(&mut self) {
        self.bits = [0; FRAME_BYTES];
        self.dirty = true;
    }

    /// the packed plane, for renderers
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// every pixel, row-major
    pub fn pixels(&self) -> impl Iterator<Item = bool> + '_ {
        (0..WIDTH * HEIGHT).map(move |n| self.bits[n / 8] & (0x80u8 >> (n % 8)) != 0)
    }

    /// (x, y) of each lit pixel
    pub fn lit(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels()
            .enumerate()
            .filter(|(_, on)| *on)
            .map(|(n, _)| (n % WIDTH, n / WIDTH))
    }

    /// has anything changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}
