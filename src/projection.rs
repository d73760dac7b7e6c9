/// Distances below this are treated as this, so a ray that starts inside a
/// wall still produces a finite strip.
const NEAR: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Scale constant: on-screen height of a wall one unit away.
    pub wall_height: f32,
    pub screen_height: usize,
    /// Distance at which the shade reaches zero.
    pub fade_distance: f32,
}

/// One column of the 3D view. `top`/`bottom` may fall outside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallStrip {
    pub top: i32,
    pub bottom: i32,
    pub shade: u8,
}

impl Projection {
    /// Wall height corrected for the angle between this ray and the view
    /// centre. Without the cosine term walls bulge toward the middle.
    #[inline]
    pub fn corrected_height(&self, distance: f32, offset_deg: f32) -> f32 {
        let perpendicular = distance.max(NEAR) * offset_deg.to_radians().cos();
        self.wall_height / perpendicular
    }

    /// Linear falloff from 255 at the viewer to 0 at `fade_distance`.
    #[inline]
    pub fn shade(&self, distance: f32) -> u8 {
        let s = 255 - (distance * 255.0 / self.fade_distance) as i32;
        s.clamp(0, 255) as u8
    }

    pub fn project(&self, distance: f32, offset_deg: f32) -> WallStrip {
        let height = self.corrected_height(distance, offset_deg);
        // truncate once, after centring; float to int casts saturate
        let top = ((self.screen_height / 2) as f32 - height / 2.0) as i32;
        let bottom = (top as f32 + height) as i32;
        WallStrip {
            top,
            bottom,
            shade: self.shade(distance),
        }
    }
}
