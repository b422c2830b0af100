//! Explicit on/off switch for the autoplay loops.

/// Whether an autoplay loop should keep going.
///
/// The running loop asks before every tick instead of re-scheduling itself,
/// so stopping autoplay is nothing more than flipping the flag.
#[derive(Clone, Debug)]
pub struct AutoplayController {
    active: bool,
}

impl AutoplayController {
    /// Creates a controller that starts out active.
    #[must_use]
    pub fn new() -> Self {
        Self { active: true }
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for AutoplayController {
    fn default() -> Self {
        Self::new()
    }
}
