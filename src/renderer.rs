use crate::canvas::Canvas;
use crate::caster::{RayHit, ray_end};
use crate::config::pack_rgb;
use crate::grid::Grid;
use crate::player::Player;
use crate::projection::Projection;

const BLACK: u32 = pack_rgb(0, 0, 0);
const WHITE: u32 = pack_rgb(255, 255, 255);
const MAP_WALL: u32 = pack_rgb(200, 200, 200);
const RAY: u32 = pack_rgb(255, 255, 255);
const OVERLAY_RAY: u32 = pack_rgb(255, 255, 0);
const CEILING: u32 = pack_rgb(50, 50, 100);
const FLOOR: u32 = pack_rgb(100, 50, 50);
const EDITOR_WALL: u32 = pack_rgb(255, 0, 0);
const EDITOR_EMPTY: u32 = pack_rgb(255, 255, 255);
const EDITOR_BORDER: u32 = pack_rgb(0, 0, 0);
pub const BLANK_MAP: u32 = pack_rgb(0, 0, 255);

const PLAYER_SIZE: i32 = 10;

pub fn draw_player(buf: &mut Canvas, player: &Player, color: u32) {
    let half = PLAYER_SIZE / 2;
    buf.fill_rect(
        player.pos[0] as i32 - half,
        player.pos[1] as i32 - half,
        PLAYER_SIZE,
        PLAYER_SIZE,
        color,
    );
}

pub fn draw_rays(buf: &mut Canvas, player: &Player, rays: &[RayHit], color: u32) {
    for ray in rays {
        let end = ray_end(player.pos, ray.angle, ray.distance);
        buf.line(player.pos, end, color);
    }
}

/// Top-down view: walls as filled tiles, and optionally the player marker
/// and the rays up to their hit points.
pub fn render_map(
    buf: &mut Canvas,
    grid: &Grid,
    player: &Player,
    player_color: Option<u32>,
    rays: Option<&[RayHit]>,
) {
    buf.clear(BLACK);

    let ts = grid.tile_size() as i32;
    for (col, row, cell) in grid.cells() {
        if cell.is_wall() {
            buf.fill_rect(col as i32 * ts, row as i32 * ts, ts, ts, MAP_WALL);
        }
    }

    if let Some(color) = player_color {
        draw_player(buf, player, color);
    }
    if let Some(rays) = rays {
        draw_rays(buf, player, rays, RAY);
    }
}

/// Ray fan on black, no map.
pub fn render_fan(buf: &mut Canvas, player: &Player, rays: &[RayHit]) {
    buf.clear(BLACK);
    draw_rays(buf, player, rays, RAY);
}

pub struct ViewStyle {
    pub fill_ceiling_floor: bool,
    /// Player marker color when the top-down overlay is drawn on the view.
    pub overlay: Option<u32>,
}

/// First-person view, one strip per ray. `rays[i]` is drawn in column `i`.
pub fn render_view(
    buf: &mut Canvas,
    player: &Player,
    rays: &[RayHit],
    projection: &Projection,
    style: &ViewStyle,
) {
    buf.clear(BLACK);
    let bottom_edge = buf.height as i32;

    for (x, ray) in rays.iter().enumerate().take(buf.width) {
        let x = x as i32;
        let strip = projection.project(ray.distance, ray.angle - player.angle);

        if style.fill_ceiling_floor {
            buf.vline(x, 0, strip.top, CEILING);
        }
        let s = strip.shade;
        buf.vline(x, strip.top, strip.bottom, pack_rgb(s, s, s));
        if style.fill_ceiling_floor {
            buf.vline(x, strip.bottom, bottom_edge, FLOOR);
        }
    }

    if let Some(color) = style.overlay {
        draw_player(buf, player, color);
        draw_rays(buf, player, rays, OVERLAY_RAY);
    }
}

/// Editable grid: red walls, white floor, black tile borders.
pub fn render_editor(buf: &mut Canvas, grid: &Grid) {
    buf.clear(WHITE);

    let ts = grid.tile_size() as i32;
    for (col, row, cell) in grid.cells() {
        let (x, y) = (col as i32 * ts, row as i32 * ts);
        let fill = if cell.is_wall() {
            EDITOR_WALL
        } else {
            EDITOR_EMPTY
        };
        buf.fill_rect(x, y, ts, ts, fill);
        buf.stroke_rect(x, y, ts, ts, EDITOR_BORDER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::frame_rays;
    use crate::config::{
        KeyScheme, MAX_RAY_DISTANCE, Movement, RayRange, SCREEN_HEIGHT, SCREEN_WIDTH,
    };
    use crate::input::Controller;
    use winit::keyboard::KeyCode;

    fn projection() -> Projection {
        Projection {
            wall_height: 4000.0,
            screen_height: SCREEN_HEIGHT,
            fade_distance: MAX_RAY_DISTANCE,
        }
    }

    #[test]
    fn map_marks_walls_and_player() {
        let grid = Grid::sample();
        let player = Player::new([160.0, 120.0], 0.0);
        let mut buf = Canvas::new(640, 512);
        render_map(&mut buf, &grid, &player, Some(EDITOR_WALL), None);

        assert_eq!(buf.get(10, 10), Some(MAP_WALL));
        assert_eq!(buf.get(100, 100), Some(BLACK));
        assert_eq!(buf.get(160, 120), Some(EDITOR_WALL));
    }

    #[test]
    fn map_without_player_marker() {
        let grid = Grid::sample();
        let player = Player::new([160.0, 120.0], 0.0);
        let mut buf = Canvas::new(640, 512);
        render_map(&mut buf, &grid, &player, None, None);
        assert_eq!(buf.get(160, 120), Some(BLACK));
    }

    fn draw_view(player: &Player, rays: &[RayHit]) -> Canvas {
        let mut buf = Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let style = ViewStyle {
            fill_ceiling_floor: true,
            overlay: None,
        };
        render_view(&mut buf, player, rays, &projection(), &style);
        buf
    }

    #[test]
    fn view_after_discrete_turn_matches_fresh_cast() {
        let grid = Grid::sample();
        let mut player = Player::new([160.0, 120.0], 0.0);
        let movement = Movement::Discrete {
            turn_step: 5.0,
            move_step: 5.0,
        };
        let mut controller = Controller::new(movement, KeyScheme::Arrows, true, false);
        let before = frame_rays(RayRange::ToWall, &grid, &player);

        controller.key_event(KeyCode::ArrowRight, true, &mut player, Some(&grid));
        let after = frame_rays(RayRange::ToWall, &grid, &player);

        // every column's offset stays inside the field of view
        let half = crate::config::FOV / 2.0;
        assert!(after.iter().all(|r| (r.angle - player.angle).abs() <= half + 1e-3));
        assert_ne!(before, after);

        let fresh = Player::new([160.0, 120.0], 5.0);
        let expected = frame_rays(RayRange::ToWall, &grid, &fresh);
        assert_eq!(after, expected);
        assert_eq!(draw_view(&player, &after).pixels, draw_view(&fresh, &expected).pixels);
    }

    #[test]
    fn view_columns_have_ceiling_wall_floor() {
        let grid = Grid::sample();
        let player = Player::new([160.0, 120.0], 0.0);
        let rays = frame_rays(RayRange::ToWall, &grid, &player);
        let mut buf = Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let style = ViewStyle {
            fill_ceiling_floor: true,
            overlay: None,
        };
        render_view(&mut buf, &player, &rays, &projection(), &style);

        let mid = SCREEN_WIDTH / 2;
        assert_eq!(buf.get(mid, 0), Some(CEILING));
        assert_eq!(buf.get(mid, SCREEN_HEIGHT - 1), Some(FLOOR));
        let wall = buf.get(mid, SCREEN_HEIGHT / 2).unwrap();
        assert_ne!(wall, CEILING);
        assert_ne!(wall, FLOOR);
    }

    #[test]
    fn view_without_fill_leaves_black() {
        let grid = Grid::sample();
        let player = Player::new([160.0, 120.0], 0.0);
        let rays = frame_rays(RayRange::ToWall, &grid, &player);
        let mut buf = Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let style = ViewStyle {
            fill_ceiling_floor: false,
            overlay: None,
        };
        render_view(&mut buf, &player, &rays, &projection(), &style);
        assert_eq!(buf.get(SCREEN_WIDTH / 2, 0), Some(BLACK));
    }

    #[test]
    fn editor_reflects_toggles() {
        let mut grid = Grid::sample();
        let mut buf = Canvas::new(640, 512);
        render_editor(&mut buf, &grid);
        assert_eq!(buf.get(32, 32), Some(EDITOR_WALL));
        assert_eq!(buf.get(96, 96), Some(EDITOR_EMPTY));
        assert_eq!(buf.get(64, 96), Some(EDITOR_BORDER));

        grid.toggle(1, 1);
        render_editor(&mut buf, &grid);
        assert_eq!(buf.get(96, 96), Some(EDITOR_WALL));
    }
}
