/// Texture trait and texture descriptor

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R11G11B10F,
    R16G16B16A16F,
    R32G32B32A32F,
    D32_FLOAT,
}

impl TextureFormat {
    /// Whether the format is a depth format
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D32_FLOAT)
    }
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Name used to look the texture up from compositor passes
    pub name: String,
    /// Width in pixels (mip 0)
    pub width: u32,
    /// Height in pixels (mip 0)
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Number of mipmap levels (1 = no mipmaps)
    pub number_of_mipmaps: u32,
    /// Number of array layers (1 = plain 2D texture)
    pub number_of_layers: u32,
    /// Number of multisamples (1 = no MSAA)
    pub number_of_multisamples: u8,
}

/// Number of mipmap levels of a full chain for the given size
pub fn full_mipmap_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Texture resource trait
pub trait Texture: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Width in pixels (mip 0)
    fn width(&self) -> u32;

    /// Height in pixels (mip 0)
    fn height(&self) -> u32;

    /// Pixel format
    fn format(&self) -> TextureFormat;

    /// Number of mipmap levels
    fn number_of_mipmaps(&self) -> u32;

    /// Number of multisamples
    fn number_of_multisamples(&self) -> u8 {
        1
    }
}
