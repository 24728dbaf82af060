/// Polygon rasterization mode.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PolygonMode {
    Point,
    Line,
    #[default]
    Fill,
}

impl PolygonMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Line => "LINE",
            Self::Fill => "FILL",
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::PolygonMode {
        match self {
            Self::Point => wgpu::PolygonMode::Point,
            Self::Line => wgpu::PolygonMode::Line,
            Self::Fill => wgpu::PolygonMode::Fill,
        }
    }

    /// Device features this mode needs.
    pub fn required_features(self) -> wgpu::Features {
        match self {
            Self::Point => wgpu::Features::POLYGON_MODE_POINT,
            Self::Line => wgpu::Features::POLYGON_MODE_LINE,
            Self::Fill => wgpu::Features::empty(),
        }
    }
}

/// Fixed-function state of the grid pipeline.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RasterState {
    /// Depth test with `Less` against a buffer cleared to 1.0 every frame.
    pub depth_test: bool,
    /// Cull back faces (front faces are counter-clockwise).
    pub cull_face: bool,
    pub polygon_mode: PolygonMode,
}

impl RasterState {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn required_features(&self) -> wgpu::Features {
        self.polygon_mode.required_features()
    }

    pub(crate) fn primitive(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: self.cull_face.then_some(wgpu::Face::Back),
            polygon_mode: self.polygon_mode.to_wgpu(),
            unclipped_depth: false,
            conservative: false,
        }
    }

    pub(crate) fn depth_stencil(&self) -> Option<wgpu::DepthStencilState> {
        self.depth_test.then(|| wgpu::DepthStencilState {
            format: Self::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }
}
