// basegfx/src/grf/constants.rs
// Core container constants that never change

// Container v2 signature, following the two zero bytes that open the file
pub const GRF_CONT_V2_SIG: [u8; 8] = [b'G', b'R', b'F', 0x82, 0x0D, 0x0A, 0x1A, 0x0A];

// Zero word + signature + u32 data offset
pub const GRF_V2_HEADER_LEN: u64 = 14;

// Beyond this the data offset is not believable
pub const MAX_PLAUSIBLE_DATA_OFFSET: u64 = 1024 * 1024 * 1024;

// Container versions
pub const CONTAINER_INVALID: u8 = 0;
pub const CONTAINER_V1: u8 = 1;
pub const CONTAINER_V2: u8 = 2;

// Compression byte following the v2 header
pub const COMPRESSION_NONE: u8 = 0;

// Record type bytes
pub const TYPE_RECOLOUR: u8 = 0xFF;
pub const TYPE_SPRITE_REF: u8 = 0xFD;
pub const TYPE_FLAG_CHUNKED: u8 = 0x02;

// Inline (v1) real sprite header after the type byte: height, width, x, y
pub const INLINE_SPRITE_HEADER: u64 = 7;

// Type byte + inline header, counted in the v1 record size
pub const INLINE_SPRITE_OVERHEAD: u32 = 8;

// Recolour sprites are always stored padded to this size
pub const RECOLOUR_SPRITE_SIZE: usize = 257;

// Size of a sprite section reference payload
pub const SPRITE_REF_SIZE: u32 = 4;

// 🖼️🧱📏🎨
