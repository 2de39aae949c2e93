use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::info;

use rusted_brawl::game::characters::roster::brawler_moveset;
use rusted_brawl::{
    Action, ActionSet, CharacterStats, EntityId, InputManager, Scene, Stage, TickEvent,
};

/// Length of the scripted match in ticks (ten seconds at 60 Hz)
const MATCH_TICKS: u64 = 600;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Brawl headless match...");

    let mut scene = Scene::new(Stage::training_ground());
    let striker = scene
        .spawn_character("striker", CharacterStats::standard(), brawler_moveset())
        .context("failed to spawn striker")?;
    let heavy = scene
        .spawn_character("heavy", CharacterStats::heavy(), brawler_moveset())
        .context("failed to spawn heavy")?;
    let players = [striker, heavy];

    let mut inputs = InputManager::new(players.len());
    let mut hits = 0;
    let mut knockouts = 0;

    while scene.current_tick() < MATCH_TICKS {
        let tick = scene.current_tick();
        inputs.set_held(0, striker_script(&scene, striker, heavy, tick));
        inputs.set_held(1, heavy_script(tick));

        let snapshots: BTreeMap<EntityId, _> =
            players.iter().copied().zip(inputs.snapshots()).collect();
        let report = scene.tick(&snapshots);
        inputs.end_tick();

        for event in &report.events {
            match event {
                TickEvent::Hit(hit) => {
                    hits += 1;
                    info!(
                        "tick {}: {} hit {} for {:.0}% (now {:.0}%)",
                        report.tick, hit.attacker, hit.target, hit.effect.damage, hit.total_damage
                    );
                }
                TickEvent::KnockedOut { id, damage, .. } => {
                    knockouts += 1;
                    info!("tick {}: {} knocked out at {:.0}%", report.tick, id, damage);
                }
                TickEvent::ProjectileSpawned { .. } | TickEvent::ProjectileExpired { .. } => {}
            }
        }
    }

    for view in scene.views() {
        info!(
            "entity {} ({:?}) at ({:.0}, {:.0}) in {} with {:.0}%",
            view.id, view.kind, view.position.x, view.position.y, view.state, view.damage
        );
    }
    info!("Match over after {MATCH_TICKS} ticks: {hits} hits, {knockouts} knock-outs");

    Ok(())
}

/// Walk toward the opponent and alternate tilts and aerials once close
fn striker_script(scene: &Scene, me: EntityId, target: EntityId, tick: u64) -> ActionSet {
    let (Some(me), Some(target)) = (scene.character(me), scene.character(target)) else {
        return ActionSet::EMPTY;
    };
    let gap = target.body.center().x - me.body.center().x;
    let toward = if gap < 0.0 { Action::Left } else { Action::Right };

    if gap.abs() > 70.0 {
        return ActionSet::EMPTY.with(toward);
    }
    match tick % 40 {
        0 => ActionSet::EMPTY.with(toward).with(Action::Attack),
        20 => ActionSet::EMPTY.with(Action::Jump),
        26 => ActionSet::EMPTY.with(Action::Attack),
        _ => ActionSet::EMPTY,
    }
}

/// Turn left and throw a projectile every second
fn heavy_script(tick: u64) -> ActionSet {
    match tick % 60 {
        0..=1 => ActionSet::EMPTY.with(Action::Left),
        30 => ActionSet::EMPTY.with(Action::Special),
        _ => ActionSet::EMPTY,
    }
}
