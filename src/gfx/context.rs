//! GPU device acquisition
//!
//! [`GpuContext`] owns the instance, adapter, device and queue. It is created
//! either headless (tests, offline runs) or against a window surface by the
//! render engine. Device loss is latched into a shared slot that the
//! simulation driver checks before every dispatch.

use std::sync::{Arc, Mutex};

use crate::error::{LifeError, Result};

/// Shared record of why the device was lost, if it was
pub type LostSlot = Arc<Mutex<Option<String>>>;

pub struct GpuContext {
    #[allow(dead_code)]
    instance: wgpu::Instance, // Keep instance alive for the lifetime of the device
    adapter: wgpu::Adapter,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    lost: LostSlot,
}

impl GpuContext {
    /// Requests an adapter and device, optionally compatible with `surface`
    pub async fn new(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| LifeError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let downlevel = adapter.get_downlevel_capabilities();
        if !downlevel
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            log::error!("Adapter {} does not support compute shaders", info.name);
            return Err(LifeError::NoAdapter);
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Life Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let lost: LostSlot = Arc::new(Mutex::new(None));
        let lost_slot = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            log::error!("Device lost ({reason:?}): {message}");
            if let Ok(mut slot) = lost_slot.lock() {
                *slot = Some(format!("{reason:?}: {message}"));
            }
        });
        device.on_uncaptured_error(Box::new(|error| {
            log::error!("Uncaptured wgpu error: {error}");
        }));

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
            lost,
        })
    }

    /// Context with no surface, for compute-only use
    pub fn headless() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        pollster::block_on(Self::new(instance, None))
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    pub(crate) fn lost_slot(&self) -> LostSlot {
        self.lost.clone()
    }

    pub fn is_lost(&self) -> bool {
        lost_reason(&self.lost).is_some()
    }
}

/// Reason recorded by the device-lost callback, if any
pub(crate) fn lost_reason(slot: &LostSlot) -> Option<String> {
    slot.lock().ok().and_then(|reason| reason.clone())
}

/// Runs `build` inside a validation error scope
///
/// Shader compile/link failures surface as [`LifeError::Shader`] instead of
/// reaching the uncaptured error handler.
pub fn with_validation_scope<T>(
    device: &wgpu::Device,
    label: &str,
    build: impl FnOnce() -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = build();
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => {
            log::error!("{label} failed validation: {error}");
            Err(LifeError::Shader {
                label: label.to_string(),
                message: error.to_string(),
            })
        }
        None => Ok(value),
    }
}
