use super::VOICE_THRESHOLD;

/// A level crossing reported by [`VoiceGate::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceEdge {
    Rose,
    Fell,
}

/// Edge-triggered loudness gate.
///
/// Holds one bit of state: whether the level was above threshold on the
/// previous frame. [`update`](Self::update) reports only transitions, so
/// a held note produces exactly one `Rose` no matter how many frames it
/// spans.
#[derive(Debug, Clone, Copy)]
pub struct VoiceGate {
    threshold: f32,
    active: bool,
    level: f32,
}

impl Default for VoiceGate {
    fn default() -> Self {
        Self::new(VOICE_THRESHOLD)
    }
}

impl VoiceGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            active: false,
            level: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The most recent frame's level, for the live level display.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Feed one frame's average level; returns the edge if one occurred.
    pub fn update(&mut self, level: f32) -> Option<VoiceEdge> {
        self.level = level;
        let loud = level > self.threshold;
        let edge = match (self.active, loud) {
            (false, true) => Some(VoiceEdge::Rose),
            (true, false) => Some(VoiceEdge::Fell),
            _ => None,
        };
        self.active = loud;
        edge
    }

    /// Forget the previous level, as if the mic had just been enabled.
    pub fn reset(&mut self) {
        self.active = false;
        self.level = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_on_transitions() {
        let mut gate = VoiceGate::default();
        assert_eq!(gate.update(10.0), None);
        assert_eq!(gate.update(45.0), Some(VoiceEdge::Rose));
        assert_eq!(gate.update(80.0), None);
        assert_eq!(gate.update(45.0), None);
        assert_eq!(gate.update(12.0), Some(VoiceEdge::Fell));
        assert_eq!(gate.update(5.0), None);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut gate = VoiceGate::default();
        assert_eq!(gate.update(30.0), None);
        assert!(!gate.is_active());
        assert_eq!(gate.update(30.1), Some(VoiceEdge::Rose));
    }

    #[test]
    fn reset_rearms_the_rising_edge() {
        let mut gate = VoiceGate::default();
        gate.update(50.0);
        gate.reset();
        assert_eq!(gate.update(50.0), Some(VoiceEdge::Rose));
    }

    #[test]
    fn tracks_the_latest_level_for_display() {
        let mut gate = VoiceGate::default();
        assert_eq!(gate.level(), 0.0);
        gate.update(120.0);
        assert_eq!(gate.level(), 120.0);
        gate.update(12.0);
        assert_eq!(gate.level(), 12.0);
        gate.reset();
        assert_eq!(gate.level(), 0.0);
    }
}
