use crate::{objects::GameObject, vision_config::ObjectLightConfig};

/// Objects never render darker than `1 / START_DIVIDE` of their base level.
pub const START_DIVIDE: u32 = 8;

/// Damp `base_level` by how strongly the local player currently sees an object.
pub fn scale_light_level(local_visibility: u8, base_level: u32) -> u32 {
    scale_light_level_with(local_visibility, base_level, START_DIVIDE)
}

pub fn scale_light_level_with(local_visibility: u8, base_level: u32, start_divide: u32) -> u32 {
    debug_assert!(start_divide > 0, "start_divide must be non-zero");
    let ratio = local_visibility as f32 / 255.0;
    let lowest = base_level / start_divide.max(1);
    let scaled = (ratio * base_level as f32) as u32;
    scaled.max(lowest)
}

/// Light level the renderer should use for `object`, floored by the configured divisor.
pub fn object_light_level(
    object: &GameObject,
    base_level: u32,
    config: &ObjectLightConfig,
) -> u32 {
    scale_light_level_with(object.local_visibility, base_level, config.start_divide)
}
