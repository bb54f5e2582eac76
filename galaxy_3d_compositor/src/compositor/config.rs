/// Workspace and shadow map configuration.

use crate::graphics_device::DeviceCapabilities;

/// Whether a multisample count is one the devices support
pub fn is_valid_multisample_count(count: u8) -> bool {
    matches!(count, 1 | 2 | 4 | 8)
}

/// Settings of a compositor workspace instance
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceConfig {
    /// Multisample count of multisample-enabled render textures
    pub number_of_multisamples: u8,
    /// Scale applied to main-relative render texture sizes
    pub resolution_scale: f32,
    /// Number of per-frame instance buffers (ring size)
    pub number_of_instance_buffers: usize,
    /// Size of each instance buffer in bytes
    pub instance_buffer_size: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            number_of_multisamples: 1,
            resolution_scale: 1.0,
            number_of_instance_buffers: 2,
            instance_buffer_size: 64 * 1024,
        }
    }
}

impl WorkspaceConfig {
    /// Check the settings against the device.
    ///
    /// # Panics
    ///
    /// On an unsupported multisample count or a non-positive resolution
    /// scale.
    pub fn validate(&self, capabilities: &DeviceCapabilities) {
        assert!(
            is_valid_multisample_count(self.number_of_multisamples)
                && self.number_of_multisamples <= capabilities.max_number_of_multisamples,
            "Unsupported multisample count {} (device maximum {})",
            self.number_of_multisamples, capabilities.max_number_of_multisamples
        );
        assert!(self.resolution_scale > 0.0, "Resolution scale must be positive");
        assert!(self.number_of_instance_buffers > 0, "At least one instance buffer is required");
    }
}

/// Shadow map pass settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowMapSettings {
    /// Width and height of one cascade in texels
    pub shadow_map_size: u32,
    /// 1 to 4 cascades
    pub number_of_cascades: u8,
    /// 1, 2, 4 or 8
    pub number_of_multisamples: u8,
    /// PCF filter size in texels
    pub filter_size: f32,
    /// Snap cascades to texels to avoid shimmering
    pub stabilize_cascades: bool,
    /// Blend between uniform (0) and logarithmic (1) cascade splits
    pub cascade_split_lambda: f32,
}

impl Default for ShadowMapSettings {
    fn default() -> Self {
        Self {
            shadow_map_size: 1024,
            number_of_cascades: 4,
            number_of_multisamples: 1,
            filter_size: 8.0,
            stabilize_cascades: true,
            cascade_split_lambda: 0.99,
        }
    }
}

impl ShadowMapSettings {
    /// Maximum number of cascades
    pub const MAXIMUM_NUMBER_OF_CASCADES: u8 = 4;

    /// # Panics
    ///
    /// On a cascade count outside 1..=4 or an unsupported multisample count.
    pub fn validate(&self) {
        assert!(
            (1..=Self::MAXIMUM_NUMBER_OF_CASCADES).contains(&self.number_of_cascades),
            "Invalid number of shadow cascades: {}", self.number_of_cascades
        );
        assert!(
            is_valid_multisample_count(self.number_of_multisamples),
            "Invalid shadow map multisample count: {}", self.number_of_multisamples
        );
        assert!(self.shadow_map_size > 0, "Shadow map size must be positive");
    }
}
