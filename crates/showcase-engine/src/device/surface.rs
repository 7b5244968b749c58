use wgpu::{CompositeAlphaMode, TextureFormat};

/// Picks the swapchain format.
///
/// With `prefer_srgb` the first sRGB 8-bit format wins, otherwise the first
/// non-sRGB one. Falls back to the adapter's first (preferred) format.
pub(crate) fn choose_surface_format(
    formats: &[TextureFormat],
    prefer_srgb: bool,
) -> Option<TextureFormat> {
    let preferred: [TextureFormat; 2] = if prefer_srgb {
        [TextureFormat::Bgra8UnormSrgb, TextureFormat::Rgba8UnormSrgb]
    } else {
        [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8Unorm]
    };

    preferred
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.iter().copied().find(|f| f.is_srgb() == prefer_srgb))
        .or_else(|| formats.first().copied())
}

pub(crate) fn choose_alpha_mode(
    modes: &[CompositeAlphaMode],
    requested: Option<CompositeAlphaMode>,
) -> CompositeAlphaMode {
    requested
        .filter(|m| modes.contains(m))
        .or_else(|| modes.first().copied())
        .unwrap_or(CompositeAlphaMode::Auto)
}
