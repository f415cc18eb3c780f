//! Parameter definitions with physical units and documented semantics.

use glam::Vec2;

/// Terrain generation parameters.
///
/// `offset` is the only field that changes frame to frame; everything else is
/// fixed at startup. The grid itself never moves in local space — scrolling
/// the offset slides the sampled window across the infinite height field.
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Grid resolution (vertices per side, N×N vertices total).
    /// Must be >= 2 for the patch to contain any quad.
    pub grid_n: usize,

    /// Spacing between adjacent grid samples in world units (meters).
    pub cell_spacing_m: f32,

    /// Maximum elevation in meters.
    pub amplitude_m: f32,

    /// Base spatial frequency of the first noise octave (cycles per meter).
    pub base_frequency: f32,

    /// Horizontal offset into the infinite noise domain (world units).
    /// Updated by input handling each frame.
    pub offset: Vec2,

    /// Perlin noise seed.
    pub noise_seed: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            grid_n: 256,
            cell_spacing_m: 0.5,
            amplitude_m: 30.0,
            base_frequency: 0.02,
            offset: Vec2::ZERO,
            noise_seed: 0,
        }
    }
}

impl TerrainParams {
    /// Offset scroll speed in world units per second.
    ///
    /// Scales with amplitude so taller terrain scrolls proportionally faster.
    pub fn scroll_speed(&self) -> f32 {
        20.0 * (self.amplitude_m / 10.0)
    }
}

/// Camera tuning parameters.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Initial eye position (meters).
    pub position: [f32; 3],

    /// Flight speed (meters per second).
    pub speed_m_per_s: f32,

    /// Mouse-look sensitivity (degrees per cursor pixel).
    pub sensitivity: f32,

    /// Initial vertical field of view (degrees). Scroll zoom adjusts this.
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 50.0, 100.0],
            speed_m_per_s: 20.0,
            sensitivity: 0.1,
            fov_degrees: 45.0,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels).
    pub window_width: u32,

    /// Window height (pixels).
    pub window_height: u32,

    /// Near clipping plane (meters).
    pub near_plane_m: f32,

    /// Far clipping plane (meters).
    pub far_plane_m: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            near_plane_m: 0.1,
            far_plane_m: 200.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// One directional light (sun).
#[derive(Debug, Clone)]
pub struct DirectionalLightParams {
    pub direction: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

/// One attenuated point light.
#[derive(Debug, Clone)]
pub struct PointLightParams {
    pub position: [f32; 3],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    /// Attenuation terms: 1 / (constant + linear*d + quadratic*d²).
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

/// Full light rig: one sun plus four point lights hovering over the patch.
#[derive(Debug, Clone)]
pub struct LightRig {
    pub directional: DirectionalLightParams,
    pub points: [PointLightParams; 4],
    /// Terrain material diffuse tint (multiplied with the texture sample).
    pub material_diffuse: [f32; 3],
    pub material_specular: [f32; 3],
    pub material_shininess: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        let point = |position: [f32; 3]| PointLightParams {
            position,
            ambient: [0.05; 3],
            diffuse: [0.8; 3],
            specular: [1.0; 3],
            constant: 1.0,
            linear: 0.002,
            quadratic: 0.0002,
        };

        Self {
            directional: DirectionalLightParams {
                direction: [-0.2, -1.0, -0.3],
                ambient: [0.05; 3],
                diffuse: [0.4; 3],
                specular: [0.5; 3],
            },
            points: [
                point([50.0, 60.0, 50.0]),
                point([100.0, 80.0, -40.0]),
                point([-60.0, 70.0, -120.0]),
                point([0.0, 65.0, -50.0]),
            ],
            material_diffuse: [0.2, 0.7, 0.2],
            material_specular: [0.2, 0.2, 0.2],
            material_shininess: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_speed_scales_with_amplitude() {
        let mut params = TerrainParams::default();
        params.amplitude_m = 10.0;
        assert_eq!(params.scroll_speed(), 20.0);

        params.amplitude_m = 30.0;
        assert_eq!(params.scroll_speed(), 60.0);
    }

    #[test]
    fn test_camera_defaults() {
        let config = CameraConfig::default();
        assert_eq!(config.speed_m_per_s, 20.0);
        assert_eq!(config.position, [0.0, 50.0, 100.0]);
        assert_eq!(config.fov_degrees, 45.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let config = RenderConfig::default();
        assert!((config.aspect_ratio() - 1280.0 / 720.0).abs() < 1e-6);
    }
}
