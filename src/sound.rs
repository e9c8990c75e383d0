use std::io::Write;

use tracing::{debug, warn};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound {
    Eat,
    Die,
    Click,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Volume {
    Mute,
    Low,
}

/// Audio feedback through the terminal bell.
pub struct Speaker {
    volume: Volume,
}

impl Sound {
    fn bells(&self) -> &'static str {
        match self {
            Sound::Eat | Sound::Click => "\x07",
            Sound::Die => "\x07\x07",
        }
    }
}

impl Speaker {
    pub fn new(volume: Volume) -> Self {
        Speaker { volume }
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn toggle_mute(&mut self) {
        self.volume = match self.volume {
            Volume::Mute => Volume::Low,
            Volume::Low => Volume::Mute,
        };
        debug!(volume = ?self.volume, "volume changed");
    }

    pub fn play<W: Write>(&self, sound: Sound, out: &mut W) {
        if self.volume == Volume::Mute {
            return;
        }

        debug!(?sound, "playing");
        if let Err(e) = out.write_all(sound.bells().as_bytes()) {
            warn!(?sound, error = %e, "could not play sound");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_speaker_is_silent() {
        let speaker = Speaker::new(Volume::Mute);
        let mut out = Vec::new();
        speaker.play(Sound::Eat, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_sounds_ring_the_bell() {
        let speaker = Speaker::new(Volume::Low);
        let mut out = Vec::new();
        speaker.play(Sound::Eat, &mut out);
        speaker.play(Sound::Die, &mut out);
        assert_eq!(out, b"\x07\x07\x07".to_vec());
    }

    #[test]
    fn test_toggle_mute() {
        let mut speaker = Speaker::new(Volume::Mute);
        speaker.toggle_mute();
        assert_eq!(speaker.volume(), Volume::Low);
        speaker.toggle_mute();
        assert_eq!(speaker.volume(), Volume::Mute);
    }
}
