mod common;

use std::time::Duration;

use bevy::app::App;
use bevy::math::IVec2;
use skirmish_core::{
    build_headless_app, run_frame, GameObject, ObjectId, ObjectRole, PlayerId, PlayerVision,
    Propulsion, TargetLock, WeaponReach,
};

const FRAME: Duration = Duration::from_millis(16);

fn app_with(objects: Vec<GameObject>, unit: GameObject, lock: TargetLock) -> App {
    common::ensure_test_config();
    let mut app = build_headless_app();
    for object in objects {
        app.world.spawn(object);
    }
    app.world.spawn((unit, lock));
    app
}

fn lock_of(app: &mut App, id: ObjectId) -> Option<TargetLock> {
    let mut query = app.world.query::<(&GameObject, &TargetLock)>();
    query
        .iter(&app.world)
        .find(|(object, _)| object.id == id)
        .map(|(_, lock)| lock.clone())
}

fn gunner() -> GameObject {
    GameObject::droid(ObjectId(1), PlayerId(0), IVec2::ZERO)
        .at_tile(10, 10)
        .with_role(ObjectRole::Weapon)
        .with_weapon(WeaponReach::GROUND)
}

#[test]
fn gunner_prefers_the_repair_droid() {
    let enemies = vec![
        GameObject::droid(ObjectId(20), PlayerId(1), IVec2::ZERO).at_tile(11, 10),
        GameObject::droid(ObjectId(21), PlayerId(1), IVec2::ZERO)
            .at_tile(14, 10)
            .with_role(ObjectRole::Service),
    ];
    let mut app = app_with(enemies, gunner(), TargetLock::attack());

    run_frame(&mut app, FRAME);
    let lock = lock_of(&mut app, ObjectId(1)).expect("unit spawned");
    assert_eq!(lock.target, Some(ObjectId(21)));
    // 4 tiles * 11 + 10 unseen - 55 service bonus
    assert_eq!(lock.cost, Some(-1));
}

#[test]
fn allies_and_far_objects_are_never_targeted() {
    let objects = vec![
        GameObject::droid(ObjectId(30), PlayerId(2), IVec2::ZERO).at_tile(11, 11),
        GameObject::droid(ObjectId(31), PlayerId(1), IVec2::ZERO).at_tile(40, 40),
    ];
    let mut app = app_with(objects, gunner(), TargetLock::attack());
    app.world
        .resource_mut::<PlayerVision>()
        .alliances
        .form(PlayerId(0), PlayerId(2))
        .expect("players 0 and 2 can ally");

    run_frame(&mut app, FRAME);
    let lock = lock_of(&mut app, ObjectId(1)).expect("unit spawned");
    assert_eq!(lock.target, None);
    assert_eq!(lock.cost, None);
}

#[test]
fn ground_gun_ignores_aircraft_but_sensor_does_not() {
    let aircraft = GameObject::droid(ObjectId(40), PlayerId(1), IVec2::ZERO)
        .at_tile(12, 10)
        .with_propulsion(Propulsion::Air);

    let mut gun_app = app_with(vec![aircraft.clone()], gunner(), TargetLock::attack());
    run_frame(&mut gun_app, FRAME);
    assert_eq!(
        lock_of(&mut gun_app, ObjectId(1)).and_then(|lock| lock.target),
        None
    );

    let spotter = GameObject::droid(ObjectId(2), PlayerId(0), IVec2::ZERO).at_tile(10, 10);
    let mut sensor_app = app_with(vec![aircraft], spotter, TargetLock::sensor());
    run_frame(&mut sensor_app, FRAME);
    assert_eq!(
        lock_of(&mut sensor_app, ObjectId(2)).and_then(|lock| lock.target),
        Some(ObjectId(40))
    );
}

#[test]
fn locked_target_survives_a_slightly_better_newcomer() {
    let first = GameObject::droid(ObjectId(50), PlayerId(1), IVec2::ZERO).at_tile(13, 10);
    let mut app = app_with(vec![first], gunner(), TargetLock::attack());
    run_frame(&mut app, FRAME);
    assert_eq!(
        lock_of(&mut app, ObjectId(1)).and_then(|lock| lock.target),
        Some(ObjectId(50))
    );

    // two tiles closer is 22 cheaper, well under the switch threshold
    app.world
        .spawn(GameObject::droid(ObjectId(51), PlayerId(1), IVec2::ZERO).at_tile(11, 10));
    run_frame(&mut app, FRAME);
    assert_eq!(
        lock_of(&mut app, ObjectId(1)).and_then(|lock| lock.target),
        Some(ObjectId(50))
    );

    // a derrick is 77 cheaper and wins outright
    app.world.spawn(
        GameObject::structure(ObjectId(52), PlayerId(1), IVec2::ZERO)
            .at_tile(13, 10)
            .with_role(ObjectRole::ResourceStructure),
    );
    run_frame(&mut app, FRAME);
    assert_eq!(
        lock_of(&mut app, ObjectId(1)).and_then(|lock| lock.target),
        Some(ObjectId(52))
    );
}
