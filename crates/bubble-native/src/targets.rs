use wgpu;

pub const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub fn create_color_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

/// Offscreen capture of the scene behind the glass bubbles: one color and
/// one depth texture at surface resolution, both sampleable from the glass
/// shader.
pub struct CaptureTargets {
    pub color_tex: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_tex: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl CaptureTargets {
    /// `None` when the requested size exceeds what the device can allocate;
    /// the caller degrades to the flat translucent material.
    pub fn try_new(device: &wgpu::Device, width: u32, height: u32) -> Option<Self> {
        let max_dim = device.limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max_dim || height > max_dim {
            log::warn!(
                "[gpu] capture target {}x{} unsupported (max {}), glass falls back to flat tint",
                width,
                height,
                max_dim
            );
            return None;
        }
        let (color_tex, color_view) = create_color_texture(
            device,
            "capture_color",
            width,
            height,
            CAPTURE_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let (depth_tex, depth_view) = create_color_texture(
            device,
            "capture_depth",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        Some(Self {
            color_tex,
            color_view,
            depth_tex,
            depth_view,
        })
    }

    pub fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        match Self::try_new(device, width, height) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }
}
