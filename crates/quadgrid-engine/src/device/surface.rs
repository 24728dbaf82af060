/// How the frame loop continues after the surface failed to hand out a texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceRecovery {
    /// The surface must be configured again; retry on the next frame.
    Reconfigure,
    /// Drop this frame only.
    Skip,
    /// The surface is unusable.
    Fatal,
}

impl SurfaceRecovery {
    pub(crate) fn for_error(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::Skip,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
        }
    }
}

/// First format whose sRGB-ness matches the preference, else the surface's first.
pub(crate) fn pick_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}

pub(crate) fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn linear_format_preferred_by_default() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(pick_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(pick_format(&formats, false), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(pick_format(&[], false), None);
    }

    #[test]
    fn opaque_alpha_when_offered() {
        let modes = [CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(pick_alpha_mode(&modes), CompositeAlphaMode::Opaque);
        assert_eq!(
            pick_alpha_mode(&[CompositeAlphaMode::Inherit]),
            CompositeAlphaMode::Inherit
        );
        assert_eq!(pick_alpha_mode(&[]), CompositeAlphaMode::Auto);
    }

    #[test]
    fn surface_errors_map_to_recovery() {
        use wgpu::SurfaceError;
        assert_eq!(SurfaceRecovery::for_error(&SurfaceError::Lost), SurfaceRecovery::Reconfigure);
        assert_eq!(SurfaceRecovery::for_error(&SurfaceError::Outdated), SurfaceRecovery::Reconfigure);
        assert_eq!(SurfaceRecovery::for_error(&SurfaceError::Timeout), SurfaceRecovery::Skip);
        assert_eq!(SurfaceRecovery::for_error(&SurfaceError::OutOfMemory), SurfaceRecovery::Fatal);
    }
}
