//! Per-frame simulation step
//!
//! Advances a running [`World`] by one frame: player controls, physics,
//! terrain streaming, camera, score and the death check, in that order.

use super::state::World;
use crate::error::SimResult;

/// Held controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Gravity flip request
    pub jump: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Points earned this tick
    pub points: u64,
    /// Player left the camera's death zone
    pub player_dead: bool,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> SimResult<TickOutcome> {
    let Some(player) = world.objects.player_mut() else {
        return Ok(TickOutcome::default());
    };
    player.handle_input(&mut world.physics, input)?;

    world.physics.update(dt);
    world.objects.update(&mut world.physics, dt)?;

    let Some(player) = world.objects.player() else {
        return Ok(TickOutcome::default());
    };
    let position = player.object().position(&world.physics)?;
    world.camera.follow(position);
    let points = world.score.update_score(position.x);
    let player_dead = world.camera.is_in_death_zone(position);
    if player_dead {
        log::info!(
            "Player left the world at ({:.0}, {:.0}) with score {}",
            position.x,
            position.y,
            world.score.score()
        );
    }

    Ok(TickOutcome {
        points,
        player_dead,
    })
}
