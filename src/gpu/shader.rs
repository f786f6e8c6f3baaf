use bytemuck::{Pod, Zeroable};

pub const SHADER_SOURCE: &str = include_str!("points.wgsl");

/// World-space instance, transformed by the camera.
pub const SPACE_WORLD: u32 = 0;
/// Overlay instance, positioned in normalized device coordinates.
pub const SPACE_SCREEN: u32 = 1;

/// One camera-facing disc.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
    pub space: u32,
    pub _pad: [u32; 3],
}

impl Instance {
    pub fn world(position: [f32; 3], size: f32, color: [f32; 4]) -> Self {
        Self {
            position,
            size,
            color,
            space: SPACE_WORLD,
            _pad: [0; 3],
        }
    }

    pub fn screen(x: f32, y: f32, size: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y, 0.0],
            size,
            color,
            space: SPACE_SCREEN,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub time: f32,
    pub ringdown: f32,
    pub _padding: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_point_shader_validates() {
        validate_wgsl(SHADER_SOURCE).unwrap();
    }

    #[test]
    fn test_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<Instance>(), 48);
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
    }
}
