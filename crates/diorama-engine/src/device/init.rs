/// Adapter, device and swapchain choices for a [`Gpu`](super::Gpu).
///
/// The defaults favour a scene that sits idle most of the time: a low-power
/// adapter, vsynced FIFO presentation and a shallow frame queue.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,
    pub present_mode: wgpu::PresentMode,

    /// Pick an sRGB swapchain format when the surface offers one.
    pub prefer_srgb: bool,

    /// Falls back to the first supported mode when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Swapchain depth hint.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            present_mode: wgpu::PresentMode::Fifo,
            prefer_srgb: true,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
