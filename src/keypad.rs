/// number of keys on the COSMAC hex keypad
pub const KEY_COUNT: usize = 16;

/// The 16-key hex keypad. Tracks which keys are held, and the first key to
/// go from released to pressed since the edge was last taken; Fx0A resolves
/// from the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    held: [bool; KEY_COUNT],
    first_edge: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a key as held. Only the low nibble of `key` is used. Pressing a
    /// key that's already down is not an edge.
    pub fn press(&mut self, key: u8) {
        let k = (key & 0x0f) as usize;
        if !self.held[k] {
            self.held[k] = true;
            if self.first_edge.is_none() {
                self.first_edge = Some(k as u8);
            }
        }
    }

    pub fn release(&mut self, key: u8) {
        self.held[(key & 0x0f) as usize] = false;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.held[(key & 0x0f) as usize]
    }

    /// the first key pressed since the last call
    pub fn take_first_edge(&mut self) -> Option<u8> {
        self.first_edge.take()
    }

    pub fn reset(&mut self) {
        self.held = [false; KEY_COUNT];
        self.first_edge = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut k = Keypad::new();
        assert!(!k.is_pressed(0x7));
        k.press(0x7);
        assert!(k.is_pressed(0x7));
        k.release(0x7);
        assert!(!k.is_pressed(0x7));
    }

    #[test]
    fn test_index_is_masked() {
        let mut k = Keypad::new();
        k.press(0x1a);
        assert!(k.is_pressed(0xa));
        assert!(k.is_pressed(0xfa));
    }

    #[test]
    fn test_first_edge_wins() {
        let mut k = Keypad::new();
        k.press(0x3);
        k.press(0x1);
        assert_eq!(k.take_first_edge(), Some(0x3));
        assert_eq!(k.take_first_edge(), None);
    }

    #[test]
    fn test_only_first_edge_is_kept() {
        let mut k = Keypad::new();
        // a host tapping keys faster than the machine steps
        for _ in 0..1000 {
            k.press(0x9);
            k.release(0x9);
            k.press(0x2);
            k.release(0x2);
        }
        assert_eq!(k.first_edge, Some(0x9));
        assert_eq!(k.take_first_edge(), Some(0x9));
        assert_eq!(k.take_first_edge(), None);
    }

    #[test]
    fn test_holding_is_not_an_edge() {
        let mut k = Keypad::new();
        k.press(0x5);
        assert_eq!(k.take_first_edge(), Some(0x5));
        k.press(0x5);
        assert_eq!(k.take_first_edge(), None);
        k.release(0x5);
        k.press(0x5);
        assert_eq!(k.take_first_edge(), Some(0x5));
    }

    #[test]
    fn test_reset() {
        let mut k = Keypad::new();
        k.press(0xf);
        k.reset();
        assert!(!k.is_pressed(0xf));
        assert_eq!(k.take_first_edge(), None);
    }
}
