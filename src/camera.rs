//! Free-flying camera with mouse look and scroll zoom.

use glam::{Mat4, Vec3};

use crate::params::{CameraConfig, RenderConfig};

/// Pitch is clamped short of the poles so the view never flips.
const PITCH_LIMIT_DEG: f32 = 89.0;

/// Scroll zoom bounds (degrees of vertical FOV).
const FOV_MIN_DEG: f32 = 1.0;
const FOV_MAX_DEG: f32 = 90.0;

/// Directional movement intents, fed from key state each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Euler-angle fly camera.
///
/// Yaw/pitch are in degrees; the starting yaw of -90° points the camera down
/// the negative Z axis.
pub struct Camera {
    pub position: Vec3,
    yaw_deg: f32,
    pitch_deg: f32,
    fov_deg: f32,
    speed: f32,
    sensitivity: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            yaw_deg: -90.0,
            pitch_deg: 0.0,
            fov_deg: config.fov_degrees,
            speed: config.speed_m_per_s,
            sensitivity: config.sensitivity,
        }
    }

    /// Unit view direction derived from the Euler angles.
    pub fn front(&self) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_deg
    }

    /// Move the camera in a view-relative direction.
    pub fn process_keyboard(&mut self, movement: CameraMovement, dt_s: f32) {
        let front = self.front();
        let right = front.cross(Vec3::Y).normalize();
        let velocity = self.speed * dt_s;

        match movement {
            CameraMovement::Forward => self.position += front * velocity,
            CameraMovement::Backward => self.position -= front * velocity,
            CameraMovement::Left => self.position -= right * velocity,
            CameraMovement::Right => self.position += right * velocity,
        }
    }

    /// Rotate the view from a cursor delta (pixels).
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.yaw_deg += dx * self.sensitivity;
        // Positive dy means the cursor moved down; pitch up is negative dy.
        self.pitch_deg = (self.pitch_deg - dy * self.sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Zoom from a scroll delta (lines).
    pub fn process_scroll(&mut self, delta: f32) {
        self.fov_deg = (self.fov_deg - delta).clamp(FOV_MIN_DEG, FOV_MAX_DEG);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    /// Combined view-projection matrix for the current zoom level.
    pub fn view_proj_matrix(&self, render_config: &RenderConfig) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.fov_deg.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );
        proj * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_front_faces_negative_z() {
        let camera = Camera::new(&CameraConfig::default());
        let front = camera.front();
        assert!((front - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_pitch_clamping() {
        let mut camera = Camera::new(&CameraConfig::default());
        // Drag the cursor far past the pole.
        camera.process_mouse(0.0, -100_000.0);
        assert!(camera.front().y <= 1.0);
        assert!((camera.front().y - PITCH_LIMIT_DEG.to_radians().sin()).abs() < 1e-4);
    }

    #[test]
    fn test_scroll_zoom_clamps_fov() {
        let mut camera = Camera::new(&CameraConfig::default());
        camera.process_scroll(1000.0);
        assert_eq!(camera.fov_degrees(), FOV_MIN_DEG);
        camera.process_scroll(-1000.0);
        assert_eq!(camera.fov_degrees(), FOV_MAX_DEG);
    }

    #[test]
    fn test_keyboard_movement_is_view_relative() {
        let mut camera = Camera::new(&CameraConfig::default());
        let start = camera.position;
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        // Initial view looks down -Z; x picks up only f32 trig noise
        // (cos of -90° is not exactly zero).
        assert!(camera.position.z < start.z);
        assert!((camera.position.x - start.x).abs() < 1e-4);

        camera.process_keyboard(CameraMovement::Right, 1.0);
        assert!(camera.position.x > start.x);
    }

    #[test]
    fn test_view_proj_matrix_is_finite() {
        let camera = Camera::new(&CameraConfig::default());
        let vp = camera.view_proj_matrix(&RenderConfig::default());
        assert_ne!(vp, Mat4::IDENTITY);
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
