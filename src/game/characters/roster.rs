// Built-in movesets
//
// Offsets are relative to the character's centre, facing right. Frame
// counts are animation frames, each shown for `frame_duration` ticks.

use glam::Vec2;

use crate::game::combat::{FrameData, HitboxSpec, MoveData, MoveKind, MoveSlot, Moveset, ProjectileSpec};

/// Quick close-range poke
pub fn jab() -> MoveData {
    let mut data = MoveData::new("jab", MoveKind::Grounded);
    let fist = data.add_hitbox(
        HitboxSpec::new(Vec2::new(32.0, -10.0), Vec2::new(28.0, 18.0))
            .damage(3.0)
            .knockback(4.0, 2.0)
            .angle(45.0),
    );
    data.frames(2, FrameData::new("jab_windup", &[]))
        .frames(2, FrameData::new("jab_hit", &[fist]))
        .frames(2, FrameData::new("jab_recovery", &[]))
}

/// Sweet spot at the tip, sour spot near the body
pub fn forward_tilt() -> MoveData {
    let mut data = MoveData::new("forward_tilt", MoveKind::Grounded);
    let tip = data.add_hitbox(
        HitboxSpec::new(Vec2::new(46.0, -4.0), Vec2::splat(24.0))
            .damage(12.0)
            .knockback(8.0, 12.0)
            .angle(35.0)
            .rotation(-20.0),
    );
    let base = data.add_hitbox(
        HitboxSpec::new(Vec2::new(24.0, -4.0), Vec2::splat(24.0))
            .damage(7.0)
            .knockback(5.0, 8.0)
            .angle(35.0),
    );
    data.frames(3, FrameData::new("ftilt_windup", &[]))
        .frame(FrameData::new("ftilt_swing", &[tip, base]).with_velocity(Vec2::new(3.0, 0.0)))
        .frame(FrameData::new("ftilt_swing", &[tip, base]))
        .frames(3, FrameData::new("ftilt_recovery", &[]))
        .prioritize(&[tip, base])
}

/// Spinning aerial: strong core, weaker rings around it
pub fn neutral_air() -> MoveData {
    let mut data = MoveData::new("neutral_air", MoveKind::Aerial);
    let core = data.add_hitbox(
        HitboxSpec::new(Vec2::ZERO, Vec2::splat(50.0))
            .damage(10.0)
            .knockback(6.0, 14.0)
            .angle(50.0),
    );
    let ring = data.add_hitbox(
        HitboxSpec::new(Vec2::ZERO, Vec2::splat(80.0))
            .damage(7.0)
            .knockback(5.0, 10.0)
            .angle(45.0),
    );
    let edge = data.add_hitbox(
        HitboxSpec::new(Vec2::ZERO, Vec2::splat(110.0))
            .damage(4.0)
            .knockback(3.0, 6.0)
            .angle(40.0),
    );
    data.frames(2, FrameData::new("nair_windup", &[]))
        .frames(4, FrameData::new("nair_spin", &[core, ring, edge]))
        .frames(3, FrameData::new("nair_recovery", &[]))
        .prioritize(&[core, ring, edge])
        .landing_lag(10)
}

/// Rising recovery; leaves the character helpless
pub fn up_special() -> MoveData {
    let mut data = MoveData::new("up_special", MoveKind::Recovery);
    let rise = data.add_hitbox(
        HitboxSpec::new(Vec2::new(0.0, -30.0), Vec2::splat(50.0))
            .damage(6.0)
            .knockback(5.0, 8.0)
            .angle(85.0),
    );
    data.frame(FrameData::new("upb_crouch", &[]))
        .frame(FrameData::new("upb_rise", &[rise]).with_velocity(Vec2::new(2.0, -14.0)))
        .frames(3, FrameData::new("upb_rise", &[rise]))
        .frames(2, FrameData::new("upb_apex", &[]))
        .landing_lag(12)
}

/// Projectile thrown forward
pub fn energy_shot() -> ProjectileSpec {
    ProjectileSpec {
        offset: Vec2::new(34.0, -10.0),
        size: Vec2::splat(16.0),
        velocity: Vec2::new(9.0, 0.0),
        gravity: 0.0,
        mass: 2.0,
        restitution: 0.3,
        lifetime: 60,
        fragile: true,
        hitbox: HitboxSpec::new(Vec2::ZERO, Vec2::splat(16.0))
            .damage(5.0)
            .knockback(3.0, 4.0)
            .angle(20.0),
    }
}

pub fn neutral_special() -> MoveData {
    MoveData::new("neutral_special", MoveKind::Aerial)
        .frames(3, FrameData::new("shot_charge", &[]))
        .frame(FrameData::new("shot_release", &[]).with_spawn(energy_shot()))
        .frames(4, FrameData::new("shot_recovery", &[]))
        .landing_lag(6)
}

/// The all-rounder moveset every built-in character uses
pub fn brawler_moveset() -> Moveset {
    Moveset::new()
        .with(MoveSlot::Jab, jab())
        .with(MoveSlot::ForwardTilt, forward_tilt())
        .with(MoveSlot::NeutralAir, neutral_air())
        .with(MoveSlot::UpSpecial, up_special())
        .with(MoveSlot::NeutralSpecial, neutral_special())
}
