use rayon::prelude::*;

use crate::config::{FOV, MAX_RAY_DISTANCE, NUM_RAYS, RAY_STEP, RayRange};
use crate::grid::Grid;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub angle: f32, // degrees
    pub distance: f32,
}

/// Angle of the ray for screen column `column`, spreading `fov` degrees
/// across `num_rays` columns starting at the left edge.
#[inline]
pub fn ray_angle(heading: f32, column: usize, num_rays: usize, fov: f32) -> f32 {
    heading - fov / 2.0 + (column as f32 / num_rays as f32) * fov
}

#[inline]
pub fn direction(angle_deg: f32) -> [f32; 2] {
    let a = angle_deg.to_radians();
    [a.cos(), a.sin()]
}

/// End point of a ray of length `distance`.
#[inline]
pub fn ray_end(origin: [f32; 2], angle_deg: f32, distance: f32) -> [f32; 2] {
    let [dx, dy] = direction(angle_deg);
    [origin[0] + dx * distance, origin[1] + dy * distance]
}

/// Marches from `origin` in unit steps until the current point is inside a
/// wall or `max_distance` is reached. Returns the distance travelled, which
/// is at most `max_distance`.
pub fn cast_ray(grid: &Grid, origin: [f32; 2], angle_deg: f32, max_distance: f32) -> f32 {
    debug_assert!(RAY_STEP <= grid.tile_size() / 2.0);

    let [dx, dy] = direction(angle_deg);
    let (mut x, mut y) = (origin[0], origin[1]);
    let mut distance = 0.0;

    while !grid.is_wall_at(x, y) && distance < max_distance {
        x += dx * RAY_STEP;
        y += dy * RAY_STEP;
        distance += RAY_STEP;
    }

    distance.min(max_distance)
}

/// Casts one ray per column. Columns are independent, so they run in parallel.
pub fn cast_fan(
    grid: &Grid,
    origin: [f32; 2],
    heading: f32,
    num_rays: usize,
    fov: f32,
    max_distance: f32,
) -> Vec<RayHit> {
    (0..num_rays)
        .into_par_iter()
        .map(|i| {
            let angle = ray_angle(heading, i, num_rays, fov);
            RayHit {
                angle,
                distance: cast_ray(grid, origin, angle, max_distance),
            }
        })
        .collect()
}

/// Fan of equal-length rays that ignores the grid.
pub fn fixed_fan(heading: f32, num_rays: usize, fov: f32, length: f32) -> Vec<RayHit> {
    (0..num_rays)
        .map(|i| RayHit {
            angle: ray_angle(heading, i, num_rays, fov),
            distance: length,
        })
        .collect()
}

/// The full-screen fan for the player's current pose. Call again whenever
/// the player or the grid changes, so drawn strips match the pose.
pub fn frame_rays(range: RayRange, grid: &Grid, player: &Player) -> Vec<RayHit> {
    match range {
        RayRange::ToWall => cast_fan(
            grid,
            player.pos,
            player.angle,
            NUM_RAYS,
            FOV,
            MAX_RAY_DISTANCE,
        ),
        RayRange::Fixed(length) => fixed_fan(player.angle, NUM_RAYS, FOV, length),
    }
}
