use bubble_core::camera::Camera;
use bubble_core::constants::{FRESNEL_POWER, GLASS_BLUR_RADIUS_PX, REFRACTION_STRENGTH};
use fnv::{FnvHashMap, FnvHashSet};
use glam::{Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::targets::{self, CaptureTargets, DEPTH_FORMAT};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
    resolution: [f32; 2],
    znear: f32,
    zfar: f32,
    refraction_strength: f32,
    fresnel_power: f32,
    blur_radius_px: f32,
    time: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    pos_radius: [f32; 4],
    color: [f32; 4],
    params: [f32; 4],
}

/// Which pipeline draws a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordMaterial {
    Solid,
    Thumbnail { hover: bool },
    Glass,
}

/// Flat renderable record for one bubble, rebuilt every frame by the
/// driver. The renderer is a function of (records, camera); it keeps no
/// per-bubble state of its own besides the refractive registry and
/// uploaded thumbnail textures.
#[derive(Clone, Debug)]
pub struct FrameBubble {
    pub slot: usize,
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec4,
    pub soft_edge: f32,
    pub highlight: f32,
    pub opacity: f32,
    pub material: RecordMaterial,
}

impl FrameBubble {
    fn instance(&self) -> InstanceData {
        InstanceData {
            pos_radius: [self.position.x, self.position.y, self.position.z, self.radius],
            color: self.color.to_array(),
            params: [self.soft_edge, self.highlight, self.opacity, 0.0],
        }
    }

    /// Translucent tinted disc standing in for glass when refraction is
    /// unavailable or disabled.
    fn fallback_instance(&self) -> InstanceData {
        InstanceData {
            pos_radius: [self.position.x, self.position.y, self.position.z, self.radius],
            color: [
                self.color.x,
                self.color.y,
                self.color.z,
                0.4 * self.opacity,
            ],
            params: [1.0, self.highlight, self.opacity, 0.0],
        }
    }
}

struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        Self {
            buffer: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: (std::mem::size_of::<InstanceData>() * capacity.max(1)) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            capacity: capacity.max(1),
        }
    }

    fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[InstanceData]) {
        if data.is_empty() {
            return;
        }
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: (std::mem::size_of::<InstanceData>() * self.capacity) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
    }
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    quad_vb: wgpu::Buffer,
    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    thumb_bgl: wgpu::BindGroupLayout,
    glass_bgl: wgpu::BindGroupLayout,
    linear_sampler: wgpu::Sampler,

    solid_capture_pipeline: wgpu::RenderPipeline,
    thumb_capture_pipeline: wgpu::RenderPipeline,
    solid_screen_pipeline: wgpu::RenderPipeline,
    thumb_screen_pipeline: wgpu::RenderPipeline,
    glass_pipeline: wgpu::RenderPipeline,

    capture: Option<CaptureTargets>,
    glass_bg: Option<wgpu::BindGroup>,
    screen_depth_view: wgpu::TextureView,

    opaque_vb: InstanceBuffer,
    thumb_vb: InstanceBuffer,
    glass_vb: InstanceBuffer,

    placeholder_bg: wgpu::BindGroup,
    thumb_bgs: FnvHashMap<(usize, bool), wgpu::BindGroup>,
    refractive: FnvHashSet<usize>,

    refraction_enabled: bool,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        refraction_enabled: bool,
        transparent_background: bool,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(bubble_core::SCENE_WGSL.into()),
        });
        let glass_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glass_shader"),
            source: wgpu::ShaderSource::Wgsl(bubble_core::GLASS_WGSL.into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let thumb_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("thumb_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let glass_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("glass_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
            ],
        });

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Quad vertices for two triangles
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let pl_scene = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let pl_thumb = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_thumb"),
            bind_group_layouts: &[&globals_bgl, &thumb_bgl],
            push_constant_ranges: &[],
        });
        let pl_glass = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_glass"),
            bind_group_layouts: &[&globals_bgl, &glass_bgl],
            push_constant_ranges: &[],
        });

        let solid_capture_pipeline = make_disc_pipeline(
            &device,
            "solid_capture",
            &pl_scene,
            &scene_shader,
            "fs_solid",
            targets::CAPTURE_FORMAT,
            true,
        );
        let thumb_capture_pipeline = make_disc_pipeline(
            &device,
            "thumb_capture",
            &pl_thumb,
            &scene_shader,
            "fs_thumbnail",
            targets::CAPTURE_FORMAT,
            true,
        );
        let solid_screen_pipeline = make_disc_pipeline(
            &device,
            "solid_screen",
            &pl_scene,
            &scene_shader,
            "fs_solid",
            format,
            true,
        );
        let thumb_screen_pipeline = make_disc_pipeline(
            &device,
            "thumb_screen",
            &pl_thumb,
            &scene_shader,
            "fs_thumbnail",
            format,
            true,
        );
        let glass_pipeline = make_disc_pipeline(
            &device,
            "glass",
            &pl_glass,
            &glass_shader,
            "fs_glass",
            format,
            false,
        );

        let capture = CaptureTargets::try_new(&device, config.width, config.height);
        let glass_bg = capture
            .as_ref()
            .map(|cap| make_glass_bind_group(&device, &glass_bgl, cap, &linear_sampler));
        let (_, screen_depth_view) = targets::create_color_texture(
            &device,
            "screen_depth",
            config.width,
            config.height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );

        let placeholder_bg = {
            // Neutral 1x1 gray shown until a thumbnail resolves (or forever,
            // when loading fails).
            let tex = device.create_texture_with_data(
                &queue,
                &wgpu::TextureDescriptor {
                    label: Some("thumb_placeholder"),
                    size: wgpu::Extent3d {
                        width: 1,
                        height: 1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                },
                wgpu::util::TextureDataOrder::LayerMajor,
                &[96u8, 100, 108, 255],
            );
            let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("thumb_placeholder_bg"),
                layout: &thumb_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&linear_sampler),
                    },
                ],
            })
        };

        let opaque_vb = InstanceBuffer::new(&device, "opaque_vb", 64);
        let thumb_vb = InstanceBuffer::new(&device, "thumb_vb", 32);
        let glass_vb = InstanceBuffer::new(&device, "glass_vb", 64);

        let clear_alpha = if transparent_background { 0.0 } else { 1.0 };
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            quad_vb,
            globals_buffer,
            globals_bg,
            thumb_bgl,
            glass_bgl,
            linear_sampler,
            solid_capture_pipeline,
            thumb_capture_pipeline,
            solid_screen_pipeline,
            thumb_screen_pipeline,
            glass_pipeline,
            capture,
            glass_bg,
            screen_depth_view,
            opaque_vb,
            thumb_vb,
            glass_vb,
            placeholder_bg,
            thumb_bgs: FnvHashMap::default(),
            refractive: FnvHashSet::default(),
            refraction_enabled,
            width: size.width.max(1),
            height: size.height.max(1),
            clear_color: wgpu::Color {
                r: 0.03,
                g: 0.04,
                b: 0.08,
                a: clear_alpha,
            },
        })
    }

    /// Bubbles register their slot here when they want the capture pass to
    /// hide them; the registry is owned by the compositor.
    pub fn register_refractive(&mut self, slot: usize) {
        self.refractive.insert(slot);
    }

    pub fn unregister_refractive(&mut self, slot: usize) {
        self.refractive.remove(&slot);
    }

    pub fn refraction_active(&self) -> bool {
        self.refraction_enabled && self.capture.is_some()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        let recreated = match &mut self.capture {
            Some(cap) => cap.recreate(&self.device, width, height),
            None => {
                self.capture = CaptureTargets::try_new(&self.device, width, height);
                self.capture.is_some()
            }
        };
        self.glass_bg = if recreated {
            self.capture.as_ref().map(|cap| {
                make_glass_bind_group(&self.device, &self.glass_bgl, cap, &self.linear_sampler)
            })
        } else {
            self.capture = None;
            None
        };
        let (_, depth_view) = targets::create_color_texture(
            &self.device,
            "screen_depth",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        self.screen_depth_view = depth_view;
    }

    /// Install a decoded thumbnail for a content bubble slot.
    pub fn upload_thumbnail(&mut self, slot: usize, hover: bool, width: u32, height: u32, rgba: &[u8]) {
        let tex = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("thumb_tex"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
        let bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("thumb_bg"),
            layout: &self.thumb_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                },
            ],
        });
        self.thumb_bgs.insert((slot, hover), bg);
    }

    fn thumb_bind_group(&self, slot: usize, hover: bool) -> &wgpu::BindGroup {
        self.thumb_bgs
            .get(&(slot, hover))
            .or_else(|| self.thumb_bgs.get(&(slot, false)))
            .unwrap_or(&self.placeholder_bg)
    }

    /// Draw one frame. Two passes when refraction is live: first the scene
    /// minus registered glass into the capture target, then the full scene
    /// to the surface with glass sampling the capture. Both passes run
    /// inside this call; nothing spans frames.
    pub fn render(
        &mut self,
        records: &[FrameBubble],
        camera: &Camera,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (right, up) = camera.right_up();
        let globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            cam_right: [right.x, right.y, right.z, 0.0],
            cam_up: [up.x, up.y, up.z, 0.0],
            resolution: [self.width as f32, self.height as f32],
            znear: camera.znear,
            zfar: camera.zfar,
            refraction_strength: REFRACTION_STRENGTH,
            fresnel_power: FRESNEL_POWER,
            blur_radius_px: GLASS_BLUR_RADIUS_PX,
            time,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let glass_live = self.refraction_active();
        let mut opaque: Vec<InstanceData> = Vec::with_capacity(records.len());
        let mut thumbs: Vec<(InstanceData, usize, bool)> = Vec::new();
        let mut glass: Vec<InstanceData> = Vec::new();
        for r in records {
            match r.material {
                RecordMaterial::Solid => opaque.push(r.instance()),
                RecordMaterial::Thumbnail { hover } => {
                    thumbs.push((r.instance(), r.slot, hover));
                }
                RecordMaterial::Glass => {
                    if glass_live && self.refractive.contains(&r.slot) {
                        glass.push(r.instance());
                    } else {
                        opaque.push(r.fallback_instance());
                    }
                }
            }
        }

        self.opaque_vb.write(&self.device, &self.queue, &opaque);
        self.glass_vb.write(&self.device, &self.queue, &glass);
        let thumb_instances: Vec<InstanceData> = thumbs.iter().map(|(i, _, _)| *i).collect();
        self.thumb_vb
            .write(&self.device, &self.queue, &thumb_instances);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let capture = if glass_live && !glass.is_empty() {
            self.capture.as_ref()
        } else {
            None
        };
        if let Some(cap) = capture {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("capture_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &cap.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &cap.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            if !opaque.is_empty() {
                rpass.set_pipeline(&self.solid_capture_pipeline);
                rpass.set_vertex_buffer(1, self.opaque_vb.buffer.slice(..));
                rpass.draw(0..6, 0..opaque.len() as u32);
            }
            if !thumbs.is_empty() {
                rpass.set_pipeline(&self.thumb_capture_pipeline);
                rpass.set_vertex_buffer(1, self.thumb_vb.buffer.slice(..));
                for (i, (_, slot, hover)) in thumbs.iter().enumerate() {
                    rpass.set_bind_group(1, self.thumb_bind_group(*slot, *hover), &[]);
                    rpass.draw(0..6, i as u32..i as u32 + 1);
                }
            }
        }

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("screen_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.screen_depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            if !opaque.is_empty() {
                rpass.set_pipeline(&self.solid_screen_pipeline);
                rpass.set_vertex_buffer(1, self.opaque_vb.buffer.slice(..));
                rpass.draw(0..6, 0..opaque.len() as u32);
            }
            if !thumbs.is_empty() {
                rpass.set_pipeline(&self.thumb_screen_pipeline);
                rpass.set_vertex_buffer(1, self.thumb_vb.buffer.slice(..));
                for (i, (_, slot, hover)) in thumbs.iter().enumerate() {
                    rpass.set_bind_group(1, self.thumb_bind_group(*slot, *hover), &[]);
                    rpass.draw(0..6, i as u32..i as u32 + 1);
                }
            }
            if !glass.is_empty() {
                if let Some(bg) = &self.glass_bg {
                    rpass.set_pipeline(&self.glass_pipeline);
                    rpass.set_bind_group(1, bg, &[]);
                    rpass.set_vertex_buffer(1, self.glass_vb.buffer.slice(..));
                    rpass.draw(0..6, 0..glass.len() as u32);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn make_glass_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capture: &CaptureTargets,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("glass_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&capture.color_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&capture.depth_view),
            },
        ],
    })
}

fn make_disc_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    color_format: wgpu::TextureFormat,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let vertex_buffers = [
        // slot 0: quad corners
        wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0,
            }],
        },
        // slot 1: instance data
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 32,
                    shader_location: 3,
                },
            ],
        },
    ];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
