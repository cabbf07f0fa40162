/// Listening state of the speech collaborator.
///
/// Transcription itself happens elsewhere; this only tracks whether continuous listening is on,
/// and whether the platform can do it at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoiceControl {
    supported: bool,
    listening: bool,
}
impl VoiceControl {
    #[must_use]
    pub fn supported() -> Self {
        Self {
            supported: true,
            listening: false,
        }
    }
    /// Speech recognition unavailable. Every transition fails.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            listening: false,
        }
    }
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.supported
    }
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }
    /// # Errors
    /// [`Unsupported`] if the platform has no speech recognition.
    pub fn start(&mut self) -> Result<(), Unsupported> {
        self.check()?;
        self.listening = true;
        Ok(())
    }
    /// # Errors
    /// [`Unsupported`] if the platform has no speech recognition.
    pub fn stop(&mut self) -> Result<(), Unsupported> {
        self.check()?;
        self.listening = false;
        Ok(())
    }
    /// Start if stopped, stop if started. Returns the new listening state.
    /// # Errors
    /// [`Unsupported`] if the platform has no speech recognition.
    pub fn toggle(&mut self) -> Result<bool, Unsupported> {
        if self.listening {
            self.stop()?;
        } else {
            self.start()?;
        }
        Ok(self.listening)
    }
    fn check(&self) -> Result<(), Unsupported> {
        if self.supported {
            Ok(())
        } else {
            Err(Unsupported)
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("speech recognition is not supported on this platform")]
pub struct Unsupported;

#[cfg(test)]
mod test {
    use super::{Unsupported, VoiceControl};
    #[test]
    fn toggles() {
        let mut voice = VoiceControl::supported();
        assert_eq!(voice.toggle(), Ok(true));
        assert!(voice.is_listening());
        assert_eq!(voice.toggle(), Ok(false));
    }
    #[test]
    fn unsupported_never_listens() {
        let mut voice = VoiceControl::unsupported();
        assert_eq!(voice.toggle(), Err(Unsupported));
        assert_eq!(voice.start(), Err(Unsupported));
        assert!(!voice.is_listening());
    }
}
