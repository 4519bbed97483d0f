use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use skirmish::game::config::InitialConfig;
use skirmish::game::simulation::{
    DespawnUnitCommand, PresentationQueue, SimTick, Simulation, SimulationPlugin, SpawnUnitCommand, Team, UnitStats,
};

fn setup_app(config: InitialConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(config);
    app.add_plugins(SimulationPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app
}

fn spawn(app: &mut App, team: Team, x: f32, stats: Option<UnitStats>) {
    app.world_mut().write_message(SpawnUnitCommand { stats, ..SpawnUnitCommand::new(team, Vec3::new(x, 0.0, 0.0)) });
}

#[test]
fn test_duel_runs_to_completion_in_app() {
    let mut app = setup_app(InitialConfig::default());
    spawn(&mut app, Team::Player, 0.0, None);
    spawn(&mut app, Team::Enemy, 1.5, None);

    for _ in 0..80 {
        app.update();
    }

    let sim = app.world().resource::<Simulation>();
    let survivors: Vec<_> = sim.registry().all_units().collect();
    assert_eq!(survivors.len(), 1, "Exactly one unit should survive the duel");
    assert_eq!(survivors[0].team, Team::Player);
    assert_eq!(survivors[0].health.current, 10.0);

    assert_eq!(app.world().resource::<SimTick>().0, 80);
    assert!(app.world().resource::<PresentationQueue>().is_empty(), "Queue is cleared at the end of each frame");
}

#[test]
fn test_spawn_uses_config_templates_unless_overridden() {
    let config = InitialConfig {
        enemy_unit: UnitStats { weapon: None, ..UnitStats::default() },
        ..InitialConfig::default()
    };
    let mut app = setup_app(config);
    spawn(&mut app, Team::Enemy, 0.0, None);
    spawn(&mut app, Team::Player, 5.0, Some(UnitStats { max_health: 42.0, ..UnitStats::default() }));
    app.update();

    let sim = app.world().resource::<Simulation>();
    let units: Vec<_> = sim.registry().all_units().collect();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].team, Team::Enemy);
    assert!(units[0].weapon.is_none());
    assert_eq!(units[1].health.max, 42.0);
}

#[test]
fn test_despawn_command_removes_unit() {
    let mut app = setup_app(InitialConfig::default());
    spawn(&mut app, Team::Enemy, 0.0, None);
    app.update();

    let id = app.world().resource::<Simulation>().registry().ids()[0];
    app.world_mut().write_message(DespawnUnitCommand { unit: id });
    app.update();

    let sim = app.world().resource::<Simulation>();
    assert!(sim.registry().is_empty());
    assert!(sim.unit(id).is_none());

    // A second despawn of the same id is ignored
    app.world_mut().write_message(DespawnUnitCommand { unit: id });
    app.update();
    assert!(app.world().resource::<Simulation>().registry().is_empty());
}
