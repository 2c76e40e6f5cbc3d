use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use game_core::{
    Action, ActorId, CombatParams, Direction, GameEvent, GridMap, Position, StatusKind,
    StepOutcome,
};
use runtime::{
    Runtime, RuntimeConfig, ScriptedProvider, TimedPresentation, Topic, init_tracing,
    load_archetypes,
};

const CATALOG: &str = r#"[
    {
        "name": "hero",
        "faction": "Player",
        "hp": 30,
        "attacks": [
            { "name": "bow", "damage": 8, "ranged": { "range": 6, "travel": { "secs": 1, "nanos": 0 } } }
        ]
    },
    { "name": "knight", "hp": 20 },
    { "name": "squire", "hp": 6 },
    {
        "name": "goblin",
        "behavior": "Wanderer",
        "attacks": [{ "name": "club", "damage": 2 }]
    }
]"#;

fn config() -> RuntimeConfig {
    RuntimeConfig {
        seed: 7,
        combat: CombatParams::always_hit(),
        ..RuntimeConfig::default()
    }
}

fn recorder() -> (Rc<RefCell<Vec<GameEvent>>>, impl FnMut(&GameEvent) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |event: &GameEvent| sink.borrow_mut().push(event.clone()))
}

#[test]
fn projectile_lands_after_other_turns_with_live_defenses() -> anyhow::Result<()> {
    RuntimeConfig {
        log_filter: "warn".to_owned(),
        ..config()
    }
    .init_logging();

    let (log, observer) = recorder();
    let mut runtime = Runtime::builder()
        .config(config())
        .map(GridMap::open(10, 10))
        .archetypes(load_archetypes(CATALOG)?)
        .player_provider(ScriptedProvider::new([Action::Fire {
            target: ActorId(1),
            attack: 0,
        }]))
        .presentation(TimedPresentation::new(Duration::from_millis(400)))
        .build()?;
    runtime.bus_mut().subscribe_all(observer);

    runtime.spawn_player("hero", Position::new(1, 1))?;
    let knight = runtime.spawn("knight", Position::new(4, 1))?;
    runtime.spawn("squire", Position::new(8, 8))?;
    assert_eq!(knight, ActorId(1));

    // Player fires; the arrow needs a second of flight.
    assert!(matches!(runtime.step()?, StepOutcome::Acted(_)));
    // Knight and squire act while the arrow flies.
    assert!(matches!(runtime.step()?, StepOutcome::Acted(report) if report.actor == knight));
    runtime.apply_interrupt(knight, StatusKind::Shielded, 5, None)?;
    assert!(matches!(runtime.step()?, StepOutcome::Acted(_)));
    assert_eq!(runtime.state().world.actor(knight).map(|a| a.hp.current), Some(20));

    // Fourth poll passes the deadline; the player has nothing scripted left.
    assert_eq!(runtime.step()?, StepOutcome::AwaitingInput(ActorId::PLAYER));
    assert_eq!(runtime.state().world.actor(knight).map(|a| a.hp.current), Some(17));

    let events = log.borrow();
    let launched = events
        .iter()
        .position(|e| matches!(e, GameEvent::ProjectileLaunched { .. }))
        .expect("launch");
    let landed = events
        .iter()
        .position(|e| matches!(e, GameEvent::Combat { .. }))
        .expect("impact");
    let turns_in_flight = events[launched..landed]
        .iter()
        .filter(|e| matches!(e, GameEvent::ActionTaken { actor, .. } if *actor != ActorId::PLAYER))
        .count();
    assert_eq!(turns_in_flight, 2);
    Ok(())
}

#[test]
fn teardown_cancels_flights_and_late_completions_are_ignored() -> anyhow::Result<()> {
    let (log, observer) = recorder();
    let mut runtime = Runtime::builder()
        .config(config())
        .map(GridMap::open(10, 10))
        .archetypes(load_archetypes(CATALOG)?)
        .player_provider(ScriptedProvider::new([Action::Fire {
            target: ActorId(1),
            attack: 0,
        }]))
        .presentation(TimedPresentation::new(Duration::from_millis(100)))
        .observer(Topic::Combat, observer)
        .build()?;

    runtime.spawn_player("hero", Position::new(1, 1))?;
    let knight = runtime.spawn("knight", Position::new(4, 1))?;
    runtime.step()?;

    let cancelled = runtime.teardown_level();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(runtime.state().deferred.pending_count(), 0);

    runtime.complete_effect(cancelled[0]);
    runtime.run(5)?;

    assert!(log.borrow().is_empty());
    assert_eq!(runtime.state().world.actor(knight).map(|a| a.hp.current), Some(20));
    Ok(())
}

#[test]
fn rejected_player_input_is_retried_next_step() -> anyhow::Result<()> {
    let mut runtime = Runtime::builder()
        .config(config())
        .map(GridMap::open(5, 5))
        .archetypes(load_archetypes(CATALOG)?)
        .player_provider(ScriptedProvider::new([
            Action::Move(Direction::North),
            Action::Move(Direction::South),
        ]))
        .build()?;
    runtime.spawn_player("hero", Position::ORIGIN)?;

    assert_eq!(runtime.step()?, StepOutcome::AwaitingInput(ActorId::PLAYER));
    match runtime.step()? {
        StepOutcome::Acted(report) => assert_eq!(report.action, Action::Move(Direction::South)),
        other => panic!("expected the second move to land, got {other:?}"),
    }
    assert_eq!(
        runtime.state().world.actor(ActorId::PLAYER).map(|a| a.position),
        Some(Position::new(0, 1))
    );
    Ok(())
}

#[test]
fn headless_level_runs_to_the_step_limit_deterministically() -> anyhow::Result<()> {
    let run = || -> anyhow::Result<Vec<GameEvent>> {
        let (log, observer) = recorder();
        let mut runtime = Runtime::builder()
            .config(config())
            .map(GridMap::from_rows(&[
                "##########",
                "#........#",
                "#..##....#",
                "#........#",
                "##########",
            ]))
            .archetypes(load_archetypes(CATALOG)?)
            .build()?;
        runtime.bus_mut().subscribe_all(observer);
        runtime.spawn("goblin", Position::new(1, 1))?;
        runtime.spawn("goblin", Position::new(8, 3))?;
        runtime.run(50)?;
        Ok(log.take())
    };

    let first = run()?;
    assert!(first.iter().any(|e| matches!(e, GameEvent::RoundBoundary { .. })));
    assert_eq!(first, run()?);
    Ok(())
}

#[test]
fn unknown_archetypes_are_reported() -> anyhow::Result<()> {
    let mut runtime = Runtime::builder()
        .map(GridMap::open(3, 3))
        .archetypes(load_archetypes(CATALOG)?)
        .build()?;
    assert!(runtime.spawn("dragon", Position::ORIGIN).is_err());
    RuntimeConfig::default().init_logging();
    assert!(!init_tracing("info"));
    assert!(!RuntimeConfig::default().init_logging());
    Ok(())
}
