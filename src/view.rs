use cgmath::{Matrix4, Rad, Deg, perspective};

/******************************************************************************/

pub struct Screen {
    pub width: u32,
    pub height: u32,
}

/// Eye orientation in degrees: pitch about X, yaw about Z.
pub struct Camera {
    pub angle_x: i32,
    pub angle_z: i32,
}

impl Camera {
    pub const DEFAULT_PITCH: i32 = -90;

    pub fn new() -> Self {
        Self{angle_x: Self::DEFAULT_PITCH, angle_z: 0}
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation-only view projection, the eye stays at the sky centre.
pub fn sky_mvp(screen: &Screen, camera: &Camera) -> Matrix4<f32> {
    let asp = screen.width as f32 / screen.height.max(1) as f32;
    let projection = perspective(Rad(1.0), asp, 0.1, 10.0);
    let rotation = Matrix4::from_angle_x(Rad::from(Deg(camera.angle_x as f32)))
                 * Matrix4::from_angle_z(Rad::from(Deg(camera.angle_z as f32)));
    projection * rotation
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    use cgmath::Vector4;

    #[test]
    fn horizon_is_level_by_default() {
        let screen = Screen{width: 800, height: 600};
        let mvp = sky_mvp(&screen, &Camera::new());
        // A point on the horizon straight ahead projects to the screen centre.
        let clip = mvp * Vector4::new(0.0, 1.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "{ndc:?}");
        assert!(clip.w > 0.0);
    }

    #[test]
    fn yaw_turns_towards_x() {
        let screen = Screen{width: 640, height: 480};
        let camera = Camera{angle_x: Camera::DEFAULT_PITCH, angle_z: 90};
        let clip = sky_mvp(&screen, &camera) * Vector4::new(1.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5, "{ndc:?}");
        assert!(clip.w > 0.0);
    }
}
