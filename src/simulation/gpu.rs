//! GPU simulation driver
//!
//! [`GpuLife`] owns the two generation images and is the only thing that
//! decides which one is current. Every dispatch reads the current image and
//! writes the other one; the roles swap after the dispatch is recorded.
//!
//! ## Ordering
//!
//! Invocations inside a dispatch run in no defined order and never talk to
//! each other. Ordering exists only between dispatches: each seeding or
//! update dispatch gets its own compute pass, and wgpu's resource tracking
//! places an execution and memory barrier between the storage write of one
//! pass and the sampled read of the next. Presentation is submitted on the
//! same queue after the updates it shows.
//!
//! ## Failure
//!
//! A lost device is fatal for the instance: every operation returns
//! [`LifeError::DeviceLost`] and the caller must build a new context and
//! driver, then seed again.

use std::sync::Arc;

use wgpu::{BindGroup, BindGroupLayout, ComputePipeline, Device, Queue};

use super::grid::{Generation, GridSize, BYTES_PER_CELL};
use super::ping_pong::PingPong;
use crate::config::LifeConfig;
use crate::error::{LifeError, Result};
use crate::gfx::context::{lost_reason, with_validation_scope, GpuContext, LostSlot};
use crate::shaders::{INIT_ENTRY_POINT, LIFE_COMPUTE_SHADER, UPDATE_ENTRY_POINT, WORKGROUP_SIZE};
use crate::wgpu_utils::{binding_types, read_texture, UniformBuffer};

/// Texel format of both generation images
pub const GENERATION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Uniform shared by `init` and `update`
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LifeParams {
    pub width: u32,
    pub height: u32,
    pub alive_threshold: f32,
    pub edge_policy: u32,
}

impl LifeParams {
    pub fn from_config(config: &LifeConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            alive_threshold: config.alive_threshold,
            edge_policy: config.edge_policy.shader_id(),
        }
    }
}

/// One generation buffer
pub struct GenerationImage {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl GenerationImage {
    fn new(device: &Device, size: GridSize, label: &str) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: size.extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: GENERATION_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Seed,
    Update,
}

impl Stage {
    fn label(self) -> &'static str {
        match self {
            Stage::Seed => "Life Seed Pass",
            Stage::Update => "Life Update Pass",
        }
    }
}

/// Game of Life on the GPU with ping-pong generation images
pub struct GpuLife {
    device: Arc<Device>,
    queue: Arc<Queue>,
    lost: LostSlot,
    config: LifeConfig,
    grid: GridSize,
    params: UniformBuffer<LifeParams>,
    init_pipeline: ComputePipeline,
    update_pipeline: ComputePipeline,
    images: PingPong<GenerationImage>,
    // bind_groups[i] reads slot i and writes slot 1 - i
    bind_groups: [BindGroup; 2],
    generation: u64,
}

impl GpuLife {
    /// Builds pipelines and both images; the grid starts all zero
    ///
    /// Call [`Self::seed`] or [`Self::upload`] before stepping.
    pub fn new(context: &GpuContext, config: &LifeConfig) -> Result<Self> {
        config.validate_for_limits(&context.limits())?;
        let grid = config.grid()?;
        let device = context.device().clone();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Life Compute Layout"),
            entries: &[
                binding_types::layout_entry(
                    0,
                    wgpu::ShaderStages::COMPUTE,
                    binding_types::uniform(),
                ),
                binding_types::layout_entry(
                    1,
                    wgpu::ShaderStages::COMPUTE,
                    binding_types::texture_2d_unfilterable(),
                ),
                binding_types::layout_entry(
                    2,
                    wgpu::ShaderStages::COMPUTE,
                    binding_types::image_2d(
                        GENERATION_FORMAT,
                        wgpu::StorageTextureAccess::WriteOnly,
                    ),
                ),
            ],
        });

        let (init_pipeline, update_pipeline) =
            with_validation_scope(&device, "Life Compute Shader", || {
                let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("Life Compute Shader"),
                    source: wgpu::ShaderSource::Wgsl(LIFE_COMPUTE_SHADER.into()),
                });
                let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("Life Compute Pipeline Layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    push_constant_ranges: &[],
                });
                (
                    create_compute_pipeline(&device, &shader, &layout, INIT_ENTRY_POINT),
                    create_compute_pipeline(&device, &shader, &layout, UPDATE_ENTRY_POINT),
                )
            })?;

        let params = UniformBuffer::new_with_data(&device, &LifeParams::from_config(config));
        let images = PingPong::new(
            GenerationImage::new(&device, grid, "Life Generation A"),
            GenerationImage::new(&device, grid, "Life Generation B"),
        );
        let [a, b] = images.slots();
        let bind_groups = [
            create_step_bind_group(&device, &bind_group_layout, &params, a, b, "Life Bind Group A->B"),
            create_step_bind_group(&device, &bind_group_layout, &params, b, a, "Life Bind Group B->A"),
        ];

        log::info!(
            "GPU life ready: {} grid, {:?} edges, threshold {}",
            grid,
            config.edge_policy,
            config.alive_threshold
        );

        Ok(Self {
            device,
            queue: context.queue().clone(),
            lost: context.lost_slot(),
            config: config.clone(),
            grid,
            params,
            init_pipeline,
            update_pipeline,
            images,
            bind_groups,
            generation: 0,
        })
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    /// Updates applied since the last seed or upload
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Slot (0 or 1) holding the latest generation
    pub fn current_index(&self) -> usize {
        self.images.current_index()
    }

    /// Both image views by slot, for building per-slot render bind groups
    pub fn slot_views(&self) -> [&wgpu::TextureView; 2] {
        let [a, b] = self.images.slots();
        [&a.view, &b.view]
    }

    pub fn is_lost(&self) -> bool {
        lost_reason(&self.lost).is_some()
    }

    fn ensure_alive(&self) -> Result<()> {
        match lost_reason(&self.lost) {
            Some(reason) => Err(LifeError::DeviceLost(reason)),
            None => Ok(()),
        }
    }

    /// Hash-seeds generation 0 with the configured threshold
    pub fn seed(&mut self) -> Result<()> {
        self.seed_with_threshold(self.config.alive_threshold)
    }

    /// Hash-seeds generation 0; cells with `random_float(y * width + x) > threshold` start alive
    pub fn seed_with_threshold(&mut self, alive_threshold: f32) -> Result<()> {
        self.ensure_alive()?;
        if !(0.0..=1.0).contains(&alive_threshold) {
            return Err(LifeError::InvalidConfig(format!(
                "alive_threshold must lie in [0, 1], got {alive_threshold}"
            )));
        }
        self.config.alive_threshold = alive_threshold;
        self.params
            .write(&self.queue, &LifeParams::from_config(&self.config));

        self.run(Stage::Seed, 1);
        self.generation = 0;
        log::debug!("Seeded {} grid at threshold {}", self.grid, alive_threshold);
        Ok(())
    }

    /// Loads the configured starting pattern
    pub fn reset(&mut self) -> Result<()> {
        match self.config.pattern {
            crate::simulation::patterns::LifePattern::Random => self.seed(),
            pattern => {
                let initial = pattern.build(self.grid, self.config.alive_threshold);
                self.upload(&initial)
            }
        }
    }

    /// Advances one tick
    pub fn step(&mut self) -> Result<()> {
        self.step_n(1)
    }

    /// Advances `ticks` generations in one submission, one pass per tick
    pub fn step_n(&mut self, ticks: u32) -> Result<()> {
        self.ensure_alive()?;
        if ticks == 0 {
            return Ok(());
        }
        self.run(Stage::Update, ticks);
        self.generation += ticks as u64;
        Ok(())
    }

    fn run(&mut self, stage: Stage, passes: u32) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Life Compute Encoder"),
            });
        for _ in 0..passes {
            self.record_pass(&mut encoder, stage);
            self.images.swap();
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Records one dispatch reading current and writing next
    fn record_pass(&self, encoder: &mut wgpu::CommandEncoder, stage: Stage) {
        let pipeline = match stage {
            Stage::Seed => &self.init_pipeline,
            Stage::Update => &self.update_pipeline,
        };
        let (groups_x, groups_y) = self.grid.workgroups(WORKGROUP_SIZE);

        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(stage.label()),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(pipeline);
        compute_pass.set_bind_group(0, &self.bind_groups[self.images.current_index()], &[]);
        compute_pass.dispatch_workgroups(groups_x, groups_y, 1);
    }

    /// Replaces the state with a host snapshot
    ///
    /// The snapshot goes into the next image, which then becomes current.
    pub fn upload(&mut self, generation: &Generation) -> Result<()> {
        self.ensure_alive()?;
        if generation.size() != self.grid {
            return Err(LifeError::PatternSize {
                width: self.grid.width(),
                height: self.grid.height(),
                got_width: generation.size().width(),
                got_height: generation.size().height(),
            });
        }

        let (_, next) = self.images.split();
        self.queue.write_texture(
            next.texture.as_image_copy(),
            &generation.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.grid.width() * BYTES_PER_CELL),
                rows_per_image: Some(self.grid.height()),
            },
            self.grid.extent(),
        );
        self.images.swap();
        self.generation = 0;
        log::debug!("Uploaded generation with {} live cells", generation.population());
        Ok(())
    }

    /// Sets cells alive; out-of-range coordinates are skipped
    ///
    /// Returns how many coordinates landed inside the grid. The generation
    /// counter is kept.
    pub fn set_alive(&mut self, cells: &[(u32, u32)]) -> Result<usize> {
        let mut snapshot = self.read_current()?;
        let applied = cells
            .iter()
            .filter(|&&(x, y)| snapshot.set(x, y, true))
            .count();
        if applied > 0 {
            let generation = self.generation;
            self.upload(&snapshot)?;
            self.generation = generation;
        }
        Ok(applied)
    }

    /// Copies the current generation back to the host
    pub fn read_current(&self) -> Result<Generation> {
        self.ensure_alive()?;
        let (data, bytes_per_row) = read_texture(
            &self.device,
            &self.queue,
            &self.images.current().texture,
            BYTES_PER_CELL,
        )
        .map_err(|e| match lost_reason(&self.lost) {
            Some(reason) => LifeError::DeviceLost(reason),
            None => e,
        })?;
        Generation::from_rgba8(self.grid, &data, bytes_per_row)
    }

    /// Live cells in the current generation
    pub fn population(&self) -> Result<usize> {
        Ok(self.read_current()?.population())
    }
}

fn create_compute_pipeline(
    device: &Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    entry_point: &str,
) -> ComputePipeline {
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(&format!("Life {entry_point} Pipeline")),
        layout: Some(layout),
        module: shader,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn create_step_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    params: &UniformBuffer<LifeParams>,
    read: &GenerationImage,
    write: &GenerationImage,
    label: &str,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params.binding_resource(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&read.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&write.view),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::grid::EdgePolicy;

    #[test]
    fn test_params_layout_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<LifeParams>(), 16);
    }

    #[test]
    fn test_params_from_config() {
        let config = LifeConfig::default()
            .with_size(40, 30)
            .with_alive_threshold(0.75)
            .with_edge_policy(EdgePolicy::Clamp);
        let params = LifeParams::from_config(&config);
        assert_eq!(
            params,
            LifeParams {
                width: 40,
                height: 30,
                alive_threshold: 0.75,
                edge_policy: 1,
            }
        );
    }
}
