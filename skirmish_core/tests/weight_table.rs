use skirmish_core::{TargetWeights, TargetingConfig};

/// The weight table encodes balance decisions; any change should be deliberate.
#[test]
fn default_weight_table_is_stable() {
    insta::assert_debug_snapshot!(TargetWeights::default(), @r###"
    TargetWeights {
        dist_tile_droid: 11,
        dist_tile_struct: 11,
        health_droid: 11,
        health_struct: 11,
        not_visible: 10,
        service_droids: 55,
        weapon_droids: 33,
        military_struct: 11,
        weapon_struct: 33,
        derrick_struct: 77,
        struct_not_built: 8,
        old_target_threshold: 44,
    }
    "###);
}

#[test]
fn builtin_json_and_defaults_agree() {
    let builtin = TargetingConfig::builtin();
    assert_eq!(builtin.weights, TargetWeights::default());
}
