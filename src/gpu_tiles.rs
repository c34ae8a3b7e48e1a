use std::{mem, ops::Range};
use wgpu::util::DeviceExt;
use thiserror::Error;
use super::{
    color::Color,
    view::ViewCoords,
    render::RenderState,
    scene::{Scene, Batch, TileInstance, SegmentVertex},
    textures::{TileImages, LAYER_SIZE, LAYER_COUNT},
};

/// The number of instances the buffers start out with room for
const INITIAL_CAPACITY: u64 = 256;

/// Draws scenes of tiles with the gpu
pub struct TileRenderer {
    /// The view and viewport size
    buffer_view: wgpu::Buffer,
    /// The bind group for the view, the face textures and the sampler
    bind_group: wgpu::BindGroup,
    /// The texture array holding the tile faces
    _texture: wgpu::Texture,
    /// The buffer holding the corners of a unit hexagon
    hex_vertices: wgpu::Buffer,
    /// The buffer holding the triangle indices of a hexagon
    hex_indices_bulk: wgpu::Buffer,
    /// The buffer holding the outline indices of a hexagon
    hex_indices_edge: wgpu::Buffer,
    /// The hexagons of the current frame
    buffer_instances: GrowingBuffer,
    /// The segment vertices of the current frame
    buffer_segments: GrowingBuffer,
    /// The render pipeline for filling
    pipeline_fill: wgpu::RenderPipeline,
    /// The render pipeline for the outline
    pipeline_outline: wgpu::RenderPipeline,
    /// The render pipeline for line segments
    pipeline_segment: wgpu::RenderPipeline,
}

impl TileRenderer {
    /// Uploads the tile faces and creates the pipelines
    ///
    /// # Parameters
    ///
    /// images: The tile faces
    ///
    /// render_state: The render state to use for rendering
    pub fn new(images: &TileImages, render_state: &RenderState) -> Self {
        let device = render_state.get_device();

        // Create the view buffer
        let buffer_view = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Buffer"),
            size: mem::size_of::<ViewUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Upload the faces
        let texture_size = wgpu::Extent3d {
            width: LAYER_SIZE,
            height: LAYER_SIZE,
            depth_or_array_layers: LAYER_COUNT,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Tile Face Texture"),
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        render_state.get_queue().write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &images.layers(LAYER_SIZE),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * LAYER_SIZE),
                rows_per_image: Some(LAYER_SIZE),
            },
            texture_size,
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Tile Face Texture View"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Tile Face Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Create bind group for the view and the faces
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bind Group Main Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Bind Group Main"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer_view.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ]
        });

        // Create the hex buffers
        let hex_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hex Vertex Buffer"),
            contents: bytemuck::cast_slice(&Vertex::vertices_hex()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let hex_indices_bulk = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hex Bulk Index Buffer"),
            contents: bytemuck::cast_slice(&Vertex::indices_bulk_hex()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let hex_indices_edge = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hex Edge Index Buffer"),
            contents: bytemuck::cast_slice(&Vertex::indices_edge_hex()),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Create the per frame buffers
        let buffer_instances = GrowingBuffer::new("Tile Instance Buffer", mem::size_of::<TileInstance>() as u64, render_state);
        let buffer_segments = GrowingBuffer::new("Segment Buffer", mem::size_of::<SegmentVertex>() as u64, render_state);

        // Create shader
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader.wgsl"));

        // Create render pipelines
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Pipeline Layout Descriptor"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let tile_buffers = [Vertex::desc_hex(), desc_instance()];
        let pipeline_fill = Self::create_pipeline(
            "Render Pipeline Fill",
            &pipeline_layout,
            &shader,
            ("vs_tile", "fs_tile"),
            &tile_buffers,
            wgpu::PrimitiveTopology::TriangleList,
            None,
            render_state,
        );
        let pipeline_outline = Self::create_pipeline(
            "Render Pipeline Outline",
            &pipeline_layout,
            &shader,
            ("vs_tile", "fs_flat"),
            &tile_buffers,
            wgpu::PrimitiveTopology::LineStrip,
            Some(wgpu::IndexFormat::Uint16),
            render_state,
        );
        let pipeline_segment = Self::create_pipeline(
            "Render Pipeline Segment",
            &pipeline_layout,
            &shader,
            ("vs_segment", "fs_flat"),
            &[desc_segment()],
            wgpu::PrimitiveTopology::LineList,
            None,
            render_state,
        );

        log::debug!("Created the tile renderer with {} texture layers of {}x{}", LAYER_COUNT, LAYER_SIZE, LAYER_SIZE);

        Self {
            buffer_view,
            bind_group,
            _texture: texture,
            hex_vertices,
            hex_indices_bulk,
            hex_indices_edge,
            buffer_instances,
            buffer_segments,
            pipeline_fill,
            pipeline_outline,
            pipeline_segment,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        label: &str,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        entry_points: (&str, &str),
        buffers: &[wgpu::VertexBufferLayout<'_>],
        topology: wgpu::PrimitiveTopology,
        strip_index_format: Option<wgpu::IndexFormat>,
        render_state: &RenderState,
    ) -> wgpu::RenderPipeline {
        render_state.get_device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: entry_points.0,
                buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: entry_points.1,
                targets: &[Some(wgpu::ColorTargetState {
                    format: render_state.get_config().format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })]
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    /// Draws a scene to the window
    ///
    /// # Parameters
    ///
    /// scene: The scene to draw
    ///
    /// view: Where the camera looks at the board
    ///
    /// background: The color to clear the screen with
    ///
    /// render_state: The render state to use for rendering
    ///
    /// # Errors
    ///
    /// See RenderError for the possible errors
    pub fn render(&mut self, scene: &Scene, view: &ViewCoords, background: &Color, render_state: &RenderState) -> Result<(), RenderError> {
        // Set the view
        let size = render_state.get_size();
        let uniform = ViewUniform {
            offset: view.get_offset().get_data(),
            zoom: view.get_zoom() as f32,
            _padding: 0.0,
            viewport: [size.width as f32, size.height as f32],
            _padding_viewport: [0.0, 0.0],
        };
        render_state.get_queue().write_buffer(&self.buffer_view, 0, bytemuck::cast_slice(&[uniform]));

        // Upload the scene
        let draws = DrawList::new(scene);
        self.buffer_instances.write(bytemuck::cast_slice(&draws.instances), render_state);
        self.buffer_segments.write(bytemuck::cast_slice(&draws.segments), render_state);

        // Get the current view
        let output_texture = render_state.get_surface().get_current_texture()?;
        let texture_view = output_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Create the encoder
        let mut encoder = render_state.get_device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Command Encoder"),
        });

        // Initialize the render pass
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                timestamp_writes: None,
                occlusion_query_set: None,
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    }
                })],
                depth_stencil_attachment: None,
            });

            // Set the main uniforms
            render_pass.set_bind_group(0, &self.bind_group, &[]);

            for draw in draws.draws.iter() {
                match draw {
                    Draw::Fills(range) => {
                        render_pass.set_pipeline(&self.pipeline_fill);
                        render_pass.set_vertex_buffer(0, self.hex_vertices.slice(..));
                        render_pass.set_vertex_buffer(1, self.buffer_instances.slice());
                        render_pass.set_index_buffer(self.hex_indices_bulk.slice(..), wgpu::IndexFormat::Uint16);
                        render_pass.draw_indexed(0..12, 0, range.clone());
                    }
                    Draw::Outlines(range) => {
                        render_pass.set_pipeline(&self.pipeline_outline);
                        render_pass.set_vertex_buffer(0, self.hex_vertices.slice(..));
                        render_pass.set_vertex_buffer(1, self.buffer_instances.slice());
                        render_pass.set_index_buffer(self.hex_indices_edge.slice(..), wgpu::IndexFormat::Uint16);
                        render_pass.draw_indexed(0..7, 0, range.clone());
                    }
                    Draw::Segments(range) => {
                        render_pass.set_pipeline(&self.pipeline_segment);
                        render_pass.set_vertex_buffer(0, self.buffer_segments.slice());
                        render_pass.draw(range.clone(), 0..1);
                    }
                }
            }
        }

        // Submit and show to screen
        render_state.get_queue().submit(std::iter::once(encoder.finish()));
        output_texture.present();

        Ok(())
    }
}

/// The data of a scene packed into two buffers, and the ranges to draw from them
#[derive(Debug, Default)]
struct DrawList {
    instances: Vec<TileInstance>,
    segments: Vec<SegmentVertex>,
    draws: Vec<Draw>,
}

#[derive(Clone, Debug, PartialEq)]
enum Draw {
    /// A range of instances
    Fills(Range<u32>),
    /// A range of instances
    Outlines(Range<u32>),
    /// A range of segment vertices
    Segments(Range<u32>),
}

impl DrawList {
    fn new(scene: &Scene) -> Self {
        let mut list = Self::default();

        for batch in scene.batches() {
            match batch {
                Batch::Fills(fills) => {
                    let range = list.push_instances(fills);
                    list.draws.push(Draw::Fills(range));
                }
                Batch::Outlines(outlines) => {
                    let range = list.push_instances(outlines);
                    list.draws.push(Draw::Outlines(range));
                }
                Batch::Segments(segments) => {
                    let start = list.segments.len() as u32;
                    list.segments.extend_from_slice(segments);
                    list.draws.push(Draw::Segments(start..list.segments.len() as u32));
                }
            }
        }

        list
    }

    fn push_instances(&mut self, instances: &[TileInstance]) -> Range<u32> {
        let start = self.instances.len() as u32;
        self.instances.extend_from_slice(instances);
        start..self.instances.len() as u32
    }
}

/// A vertex buffer rewritten every frame which grows when the data does not fit
struct GrowingBuffer {
    label: &'static str,
    /// The size of one element in bytes
    stride: u64,
    /// The number of elements there is room for
    capacity: u64,
    buffer: wgpu::Buffer,
}

impl GrowingBuffer {
    fn new(label: &'static str, stride: u64, render_state: &RenderState) -> Self {
        Self {
            label,
            stride,
            capacity: INITIAL_CAPACITY,
            buffer: Self::create(label, stride * INITIAL_CAPACITY, render_state),
        }
    }

    fn create(label: &str, size: u64, render_state: &RenderState) -> wgpu::Buffer {
        render_state.get_device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replaces the content of the buffer
    fn write(&mut self, data: &[u8], render_state: &RenderState) {
        if data.is_empty() {
            return;
        }

        let needed = data.len() as u64 / self.stride;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = Self::create(self.label, self.stride * self.capacity, render_state);
            log::debug!("Grew {} to {} elements", self.label, self.capacity);
        }

        render_state.get_queue().write_buffer(&self.buffer, 0, data);
    }

    fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// The view as seen by the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniform {
    /// The position on the board in the top left corner
    offset: [f32; 2],
    zoom: f32,
    _padding: f32,
    /// The size of the viewport in pixels
    viewport: [f32; 2],
    _padding_viewport: [f32; 2],
}

/// Describes a vertex within a hexagon
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    /// The position relative to the center for radius 1
    position: [f32; 2],
}

impl Vertex {
    /// Gets the memory description of a hex vertex
    fn desc_hex() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ]
        }
    }

    /// Generates the vertices of a flat topped hexagon of radius 1, vertex i at i * 60 degrees
    fn vertices_hex() -> [Self; 6] {
        std::array::from_fn(|i| {
            let angle = (i as f64) * std::f64::consts::FRAC_PI_3;
            Self { position: [angle.cos() as f32, angle.sin() as f32] }
        })
    }

    /// Generates indices for the vertices for the bulk of a hexagon
    const fn indices_bulk_hex() -> [u16; 12] {
        [
            2, 3, 4,
            2, 4, 5,
            1, 2, 5,
            0, 1, 5,
        ]
    }

    /// Generates indices for the vertices for the edge of a hexagon
    const fn indices_edge_hex() -> [u16; 7] {
        [0, 1, 2, 3, 4, 5, 0]
    }
}

/// Gets the memory description of a tile instance
fn desc_instance() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32,
        3 => Uint32,
        4 => Float32x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TileInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBUTES,
    }
}

/// Gets the memory description of a segment vertex
fn desc_segment() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SegmentVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

#[derive(Error, Debug, Clone)]
pub enum RenderError {
    #[error("Unable to get surface texture: {:?}", .0)]
    SurfaceTexture(wgpu::SurfaceError),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(err: wgpu::SurfaceError) -> RenderError {
        RenderError::SurfaceTexture(err)
    }
}
