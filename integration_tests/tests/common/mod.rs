use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Frame length that makes the default fade step exactly 20 levels.
#[allow(dead_code)]
pub const FIFTH_OF_A_SECOND: Duration = Duration::from_millis(200);

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures");
        let vision = fixtures.join("test_vision_config.json");
        let targeting = fixtures.join("test_targeting_config.json");

        debug_assert!(
            vision.exists(),
            "missing test vision config at {}",
            vision.display()
        );
        debug_assert!(
            targeting.exists(),
            "missing test targeting config at {}",
            targeting.display()
        );

        std::env::set_var("VISION_CONFIG_PATH", &vision);
        std::env::set_var("TARGETING_CONFIG_PATH", &targeting);
    });
}
