use std::time::Duration;

use bevy::prelude::*;

/// Rendered frame counter and the real time the current frame covers.
///
/// The host writes the delta before each update so fading stays frame-rate
/// independent and tests can drive exact steps.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    frame: u64,
    delta: Duration,
}

impl FrameClock {
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn set_delta(&mut self, delta: Duration) {
        self.delta = delta;
    }
}

/// Last system of the frame.
pub fn advance_frame(mut clock: ResMut<FrameClock>) {
    clock.frame = clock.frame.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_frame_counts_updates() {
        let mut app = App::new();
        app.insert_resource(FrameClock::default())
            .add_systems(Update, advance_frame);
        app.update();
        app.update();
        assert_eq!(app.world.resource::<FrameClock>().frame(), 2);
    }

    #[test]
    fn delta_seconds_reflects_duration() {
        let mut clock = FrameClock::default();
        clock.set_delta(Duration::from_millis(250));
        assert_eq!(clock.delta_seconds(), 0.25);
    }
}
