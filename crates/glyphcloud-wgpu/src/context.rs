use anyhow::{anyhow, Result};

/// Device and queue shared by every resource of the backend.
pub struct GfxContext {
    pub device: wgpu::Device,
    pub queue:  wgpu::Queue,
    pub adapter_info: wgpu::AdapterInfo,
}

impl GfxContext {
    /// Creates a context without a presentation surface.
    pub async fn new_headless() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        // Choose a high‑performance adapter; no surface to be compatible with.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference:         wgpu::PowerPreference::HighPerformance,
                compatible_surface:       None,
                force_fallback_adapter:   false,
            })
            .await
            .ok_or_else(|| anyhow!("Failed to find a suitable GPU adapter."))?;

        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter {:?} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.device_type,
            adapter_info.backend
        );

        // Request a device and its command queue.
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label:            Some("Glyphcloud Device"),
                    required_features: wgpu::Features::empty(),
                    // Use default limits for broad compatibility.
                    required_limits:   wgpu::Limits::default(),
                },
                None, // no trace
            )
            .await?;

        Ok(Self {
            device,
            queue,
            adapter_info,
        })
    }
}
