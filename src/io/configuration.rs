//! Level constants and runtime configuration defaults

/// File extension used for persisted levels
pub const LEVEL_EXTENSION: &str = "level";

/// Level name used when none is given
pub const DEFAULT_LEVEL_NAME: &str = "Test";

/// Version written into level documents
pub const LEVEL_FORMAT_VERSION: u32 = 1;

/// Pixel colour marking an occupied cell in a mask image (opaque black)
pub const OCCUPIED_COLOR: [u8; 4] = [0, 0, 0, 255];

// Mask export background
/// Pixel colour written for empty cells when exporting a mask
pub const EMPTY_COLOR: [u8; 4] = [0, 0, 0, 0];

/// Offset from a tile's integer corner to its world-space centre
pub const TILE_CENTER_OFFSET: f32 = 0.5;

/// Prefab index used for every tile created from a mask
pub const MASK_PREFAB_INDEX: usize = 0;

/// Number of prefabs in the headless palette used by the CLI
pub const DEFAULT_PALETTE_SIZE: usize = 1;

// Safety limit to prevent excessive memory allocation
/// Maximum allowed mask width or height
pub const MAX_MASK_DIMENSION: usize = 10_000;

// Progress bar display settings
/// Width of the batch progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Logging
/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";
/// Log filter used with `--quiet`
pub const QUIET_LOG_FILTER: &str = "warn";
/// Log filter used with `--verbose`
pub const VERBOSE_LOG_FILTER: &str = "debug";
