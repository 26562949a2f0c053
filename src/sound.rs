use beep::beep;

use crate::error::SoundError;

/// The sound device. The interpreter only calls these on edges of the audio
/// gate, so a device never sees two beeps or two stops in a row.
pub trait Sound {
    fn beep(&mut self) -> Result<(), SoundError>;
    fn stop(&mut self) -> Result<(), SoundError>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// the PC speaker, through the `beep` crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), SoundError> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| SoundError(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SoundError> {
        beep(0).map_err(|e| SoundError(e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if self.is_beeping {
            let _ = beep(0);
        }
    }
}

/// no sound at all
#[derive(Debug, Default)]
pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SoundError> {
        Ok(())
    }
}
