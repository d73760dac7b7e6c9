use std::fmt;
use std::str::FromStr;

pub const SCREEN_WIDTH: usize = 640;
pub const SCREEN_HEIGHT: usize = 480;
pub const FOV: f32 = 60.0; // degrees
pub const NUM_RAYS: usize = SCREEN_WIDTH;
pub const TILE_SIZE: f32 = 64.0;

/// Distance a ray advances between wall tests. Must stay at or below half the
/// thinnest wall, otherwise rays can step over a tile.
pub const RAY_STEP: f32 = 1.0;
/// Rays stop after this many world units even if nothing was hit.
pub const MAX_RAY_DISTANCE: f32 = SCREEN_WIDTH as f32;
/// Length of each ray in the fan-only variant, which has no map to hit.
pub const FAN_RAY_LENGTH: f32 = 100.0;

/// Continuous movement is applied once per tick, independent of frame rate.
pub const TICK_RATE: f32 = 60.0;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// One of the six tutorial programs, each a preset over the feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Fixed-length ray fan, no map.
    Fan,
    /// Map in one window, rays cast to the walls in another.
    Rays,
    /// Map with rays cast until they hit a wall.
    Minimap,
    /// Adds the projected 3D view.
    Projected,
    /// Held-key movement with collision, ceiling and floor fill.
    Shaded,
    /// Adds the live map editor window.
    #[default]
    Editor,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Fan,
        Variant::Rays,
        Variant::Minimap,
        Variant::Projected,
        Variant::Shaded,
        Variant::Editor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Fan => "fan",
            Variant::Rays => "rays",
            Variant::Minimap => "minimap",
            Variant::Projected => "projected",
            Variant::Shaded => "shaded",
            Variant::Editor => "editor",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant `{}`, expected one of: ", self.0)?;
        let names: Vec<&str> = Variant::ALL.iter().map(|v| v.name()).collect();
        f.write_str(&names.join(", "))
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == lowered)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// One step per key-press event.
    Discrete { turn_step: f32, move_step: f32 },
    /// Applied every tick while the key is held.
    Continuous { turn_rate: f32, move_rate: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScheme {
    Arrows,
    Wasd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayRange {
    /// Rays are drawn at a fixed length without consulting the grid.
    Fixed(f32),
    /// Rays are marched until they hit a wall or the distance cap.
    ToWall,
}

/// Which windows are opened and what the map window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSet {
    pub map: bool,
    /// Player marker on the map window.
    pub map_player: bool,
    pub map_rays: bool,
    pub view3d: bool,
    pub editor: bool,
    /// Separate window holding only the ray fan.
    pub ray_window: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub variant: Variant,
    pub movement: Movement,
    pub keys: KeyScheme,
    /// Held turns are applied before held moves within a tick.
    pub turn_first: bool,
    pub collide: bool,
    pub views: ViewSet,
    pub ray_range: RayRange,
    pub wall_height: f32,
    pub fill_ceiling_floor: bool,
    /// Draw the player marker and rays over the 3D view as well.
    pub overlay_on_view: bool,
    pub player_color: u32,
    pub player_start: [f32; 2],
}

impl Config {
    pub fn for_variant(variant: Variant) -> Self {
        let grid_start = [SCREEN_WIDTH as f32 / 4.0, SCREEN_HEIGHT as f32 / 4.0];
        let discrete = Movement::Discrete {
            turn_step: 5.0,
            move_step: 5.0,
        };
        let red = pack_rgb(255, 0, 0);

        match variant {
            Variant::Fan => Self {
                variant,
                movement: discrete,
                keys: KeyScheme::Arrows,
                turn_first: true,
                collide: false,
                views: ViewSet {
                    map: true,
                    map_player: false,
                    map_rays: false,
                    view3d: false,
                    editor: false,
                    ray_window: true,
                },
                ray_range: RayRange::Fixed(FAN_RAY_LENGTH),
                wall_height: 0.0,
                fill_ceiling_floor: false,
                overlay_on_view: false,
                player_color: red,
                player_start: [SCREEN_WIDTH as f32 / 2.0, SCREEN_HEIGHT as f32 / 2.0],
            },
            Variant::Rays => Self {
                variant,
                movement: discrete,
                keys: KeyScheme::Arrows,
                turn_first: true,
                collide: false,
                views: ViewSet {
                    map: true,
                    map_player: true,
                    map_rays: false,
                    view3d: false,
                    editor: false,
                    ray_window: true,
                },
                ray_range: RayRange::ToWall,
                wall_height: 0.0,
                fill_ceiling_floor: false,
                overlay_on_view: false,
                player_color: red,
                player_start: grid_start,
            },
            Variant::Minimap => Self {
                variant,
                movement: discrete,
                keys: KeyScheme::Arrows,
                turn_first: true,
                collide: false,
                views: ViewSet {
                    map: true,
                    map_player: true,
                    map_rays: true,
                    view3d: false,
                    editor: false,
                    ray_window: false,
                },
                ray_range: RayRange::ToWall,
                wall_height: 0.0,
                fill_ceiling_floor: false,
                overlay_on_view: false,
                player_color: red,
                player_start: grid_start,
            },
            Variant::Projected => Self {
                variant,
                movement: discrete,
                keys: KeyScheme::Arrows,
                turn_first: true,
                collide: false,
                views: ViewSet {
                    map: true,
                    map_player: true,
                    map_rays: true,
                    view3d: true,
                    editor: false,
                    ray_window: false,
                },
                ray_range: RayRange::ToWall,
                wall_height: 3000.0,
                fill_ceiling_floor: false,
                overlay_on_view: false,
                player_color: red,
                player_start: grid_start,
            },
            Variant::Shaded => Self {
                variant,
                movement: Movement::Continuous {
                    turn_rate: 5.0,
                    move_rate: 3.0,
                },
                keys: KeyScheme::Arrows,
                turn_first: true,
                collide: true,
                views: ViewSet {
                    map: true,
                    map_player: true,
                    map_rays: false,
                    view3d: true,
                    editor: false,
                    ray_window: false,
                },
                ray_range: RayRange::ToWall,
                wall_height: 4000.0,
                fill_ceiling_floor: true,
                overlay_on_view: false,
                player_color: red,
                player_start: grid_start,
            },
            Variant::Editor => Self {
                variant,
                movement: Movement::Continuous {
                    turn_rate: 2.0,
                    move_rate: 2.0,
                },
                keys: KeyScheme::Wasd,
                turn_first: false,
                collide: true,
                views: ViewSet {
                    map: true,
                    map_player: false,
                    map_rays: false,
                    view3d: true,
                    editor: true,
                    ray_window: false,
                },
                ray_range: RayRange::ToWall,
                wall_height: 4000.0,
                fill_ceiling_floor: true,
                overlay_on_view: true,
                player_color: pack_rgb(0, 255, 0),
                player_start: grid_start,
            },
        }
    }

    /// Whether the map grid takes part in this variant at all.
    pub fn uses_grid(&self) -> bool {
        self.ray_range == RayRange::ToWall
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}
