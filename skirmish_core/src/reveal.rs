use bevy::prelude::Resource;

/// Whether unexplored tiles render as dim fog (`true`) or pure black (`false`).
///
/// Campaign scripts flip this for total darkness on unexplored ground. A change
/// re-runs the visibility baseline on the next frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealMode {
    enabled: bool,
}

impl Default for RevealMode {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl RevealMode {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn reveal_status(&self) -> bool {
        self.enabled
    }

    pub fn set_reveal_status(&mut self, enabled: bool) {
        tracing::debug!(
            target: "skirmish::fog",
            "reveal_mode.set={}",
            if enabled { "ON" } else { "OFF" }
        );
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_defaults_on() {
        assert!(RevealMode::default().reveal_status());
    }

    #[test]
    fn set_reveal_status_flips_flag() {
        let mut reveal = RevealMode::default();
        reveal.set_reveal_status(false);
        assert!(!reveal.reveal_status());
        reveal.set_reveal_status(true);
        assert!(reveal.reveal_status());
    }
}
