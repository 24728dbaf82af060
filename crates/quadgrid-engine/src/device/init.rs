/// Initialization parameters for the GPU layer.
///
/// Add configuration flags only when a concrete backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends tried first when creating the instance and surface.
    pub backends: wgpu::Backends,

    /// Backends tried when no adapter/device could be brought up on `backends`.
    pub fallback_backends: Option<wgpu::Backends>,

    /// Prefer an sRGB surface format when available.
    ///
    /// The grid shader writes its vertex colors unconverted, so the default
    /// selects a linear format to match a plain framebuffer.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Features the device must have. Missing ones fail initialization.
    pub required_features: wgpu::Features,

    /// Features enabled only when the adapter supports them.
    pub optional_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// Texture dimension limits are raised to whatever the adapter supports.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            fallback_backends: None,
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::TIMESTAMP_QUERY,
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Backend sets to try, in order.
    pub(crate) fn backend_attempts(&self) -> Vec<wgpu::Backends> {
        let mut attempts = vec![self.backends];
        if let Some(fallback) = self.fallback_backends {
            if fallback != self.backends {
                attempts.push(fallback);
            }
        }
        attempts
    }

    /// Resolves the feature set to request from an adapter supporting `supported`.
    ///
    /// Returns the missing required features on failure.
    pub(crate) fn resolve_features(
        &self,
        supported: wgpu::Features,
    ) -> Result<wgpu::Features, wgpu::Features> {
        let missing = self.required_features.difference(supported);
        if !missing.is_empty() {
            return Err(missing);
        }
        Ok(self.required_features | self.optional_features.intersection(supported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempts_without_fallback() {
        let init = GpuInit::default();
        assert_eq!(init.backend_attempts(), vec![wgpu::Backends::all()]);
    }

    #[test]
    fn attempts_include_distinct_fallback() {
        let init = GpuInit {
            backends: wgpu::Backends::GL,
            fallback_backends: Some(wgpu::Backends::PRIMARY),
            ..GpuInit::default()
        };
        assert_eq!(
            init.backend_attempts(),
            vec![wgpu::Backends::GL, wgpu::Backends::PRIMARY]
        );
    }

    #[test]
    fn identical_fallback_is_not_retried() {
        let init = GpuInit {
            fallback_backends: Some(wgpu::Backends::all()),
            ..GpuInit::default()
        };
        assert_eq!(init.backend_attempts().len(), 1);
    }

    #[test]
    fn optional_features_are_dropped_when_unsupported() {
        let init = GpuInit::default();
        assert_eq!(init.resolve_features(wgpu::Features::empty()), Ok(wgpu::Features::empty()));
        assert_eq!(
            init.resolve_features(wgpu::Features::TIMESTAMP_QUERY),
            Ok(wgpu::Features::TIMESTAMP_QUERY)
        );
    }

    #[test]
    fn missing_required_features_are_reported() {
        let init = GpuInit {
            required_features: wgpu::Features::POLYGON_MODE_LINE,
            ..GpuInit::default()
        };
        assert_eq!(
            init.resolve_features(wgpu::Features::TIMESTAMP_QUERY),
            Err(wgpu::Features::POLYGON_MODE_LINE)
        );
    }
}
