use std::iter;

use wgpu::TextureFormat;

use crate::gfx::context::GpuContext;
use super::life_renderer::LifeRenderer;
use crate::error::{LifeError, Result};
use crate::simulation::gpu::GpuLife;

/// First non-sRGB format, else the first format offered
pub fn pick_surface_format(formats: &[TextureFormat]) -> Result<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .ok_or_else(|| LifeError::Surface("adapter reports no presentable formats".to_string()))
}

/// Window surface plus the device it was created against
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    context: GpuContext,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
}

impl RenderEngine {
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let context = GpuContext::new(instance, Some(&surface)).await?;

        let surface_capabilities = surface.get_capabilities(context.adapter());
        let format = pick_surface_format(&surface_capabilities.formats)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(context.device(), &config);
        log::info!("Surface configured: {}x{} {:?}", config.width, config.height, format);

        Ok(RenderEngine {
            surface,
            context,
            config,
            format,
        })
    }

    /// Draws the current generation and presents it
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame(&mut self, life: &GpuLife, renderer: &LifeRenderer) -> Result<()> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(self.context.device(), &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => {
                if self.context.is_lost() {
                    return Err(LifeError::DeviceLost(e.to_string()));
                }
                log::error!("Failed to acquire surface texture: {e}");
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.format),
                ..Default::default()
            });
        let mut encoder = self
            .context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        renderer.draw(&mut encoder, &surface_texture_view, life);

        self.context.queue().submit(iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.context.device(), &self.config);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn device(&self) -> &wgpu::Device {
        self.context.device()
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_surface_format_prefers_linear() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(pick_surface_format(&formats).unwrap(), TextureFormat::Bgra8Unorm);
        assert_eq!(
            pick_surface_format(&[TextureFormat::Rgba8UnormSrgb]).unwrap(),
            TextureFormat::Rgba8UnormSrgb
        );
    }

    #[test]
    fn test_pick_surface_format_without_formats() {
        let err = pick_surface_format(&[]).unwrap_err();
        assert!(matches!(err, LifeError::Surface(_)));
    }
}
