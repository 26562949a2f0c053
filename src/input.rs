use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// map of keys on the left-hand side of a qwerty keyboard to the COSMAC hex
/// keypad, keeping the keypad's 4x4 shape:
///
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// what the host tells the interpreter between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(u8),
    KeyUp(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// everything that's happened since the last poll; never blocks
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error>;
}

/// Terminals report key presses (and auto-repeats) but never releases, so
/// a key counts as held for a while after each press, and is let go once
/// that runs out.
#[derive(Debug)]
pub struct KeyLatch {
    hold: Duration,
    release_at: [Option<Instant>; 16],
}

impl KeyLatch {
    pub fn new(hold: Duration) -> Self {
        KeyLatch {
            hold,
            release_at: [None; 16],
        }
    }

    /// (re)arm a key; true if it wasn't already down
    pub fn press(&mut self, key: u8, now: Instant) -> bool {
        let slot = &mut self.release_at[(key & 0x0f) as usize];
        let was_up = slot.is_none();
        *slot = Some(now + self.hold);
        was_up
    }

    /// let go of every key whose hold has run out
    pub fn expire(&mut self, now: Instant) -> Vec<u8> {
        let mut released = Vec::new();
        for (key, slot) in self.release_at.iter_mut().enumerate() {
            if matches!(slot, Some(at) if *at <= now) {
                *slot = None;
                released.push(key as u8);
            }
        }
        released
    }
}

/// implementation of Input using the terminal, via crossterm
pub struct StdinInput {
    keymap: HashMap<char, u8>,
    latch: KeyLatch,
}

impl StdinInput {
    /// puts the terminal in raw mode until this is dropped
    pub fn new(key_hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            latch: KeyLatch::new(key_hold),
        })
    }

    fn read_stdin(&mut self, events: &mut Vec<InputEvent>) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => events.push(InputEvent::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(InputEvent::Quit)
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => {
                            if self.latch.press(mapped_key, Instant::now()) {
                                events.push(InputEvent::KeyDown(mapped_key));
                            }
                        }
                        None => warn!("can't map {:?} to a COSMAC key", key),
                    },
                    other => debug!("ignoring key {:?}", other),
                },
                other => debug!("ignoring event {:?}", other),
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        let mut events: Vec<InputEvent> = self
            .latch
            .expire(Instant::now())
            .into_iter()
            .map(InputEvent::KeyUp)
            .collect();
        self.read_stdin(&mut events)?;
        Ok(events)
    }
}

/// dummy Input implementation for testing; hands out one batch per poll
#[derive(Debug, Default)]
pub struct DummyInput {
    batches: VecDeque<Vec<InputEvent>>,
}

impl DummyInput {
    pub fn new(batches: Vec<Vec<InputEvent>>) -> Self {
        DummyInput {
            batches: batches.into(),
        }
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, io::Error> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut keys: Vec<u8> = map.values().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
        assert_eq!(map[&'4'], 0x0c);
        assert_eq!(map[&'x'], 0x00);
        assert_eq!(map[&'v'], 0x0f);
    }

    #[test]
    fn test_latch_holds_then_releases() {
        let t0 = Instant::now();
        let mut latch = KeyLatch::new(Duration::from_millis(100));
        assert!(latch.press(0x5, t0));
        assert!(latch.expire(t0 + Duration::from_millis(50)).is_empty());
        assert_eq!(latch.expire(t0 + Duration::from_millis(100)), vec![0x5]);
        assert!(latch.expire(t0 + Duration::from_millis(200)).is_empty());
    }

    #[test]
    fn test_latch_repeat_extends_hold() {
        let t0 = Instant::now();
        let mut latch = KeyLatch::new(Duration::from_millis(100));
        assert!(latch.press(0xa, t0));
        // auto-repeat isn't a new press
        assert!(!latch.press(0xa, t0 + Duration::from_millis(80)));
        assert!(latch.expire(t0 + Duration::from_millis(150)).is_empty());
        assert_eq!(latch.expire(t0 + Duration::from_millis(180)), vec![0xa]);
    }

    #[test]
    fn test_dummy_input_batches() -> Result<(), io::Error> {
        let mut input = DummyInput::new(vec![
            vec![InputEvent::KeyDown(1)],
            vec![InputEvent::KeyUp(1), InputEvent::Quit],
        ]);
        assert_eq!(input.poll()?, vec![InputEvent::KeyDown(1)]);
        assert_eq!(input.poll()?, vec![InputEvent::KeyUp(1), InputEvent::Quit]);
        assert!(input.poll()?.is_empty());
        Ok(())
    }
}
