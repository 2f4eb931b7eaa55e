//! Brightness patterns and their text encoding.
//!
//! Pure functions only: no I/O, no shared state.
//!
//! # Format
//!
//! ```text
//! 0000000000000000000000000      25 rows of 25 hex digits,
//! 00000000000FFF00000000000      '0' = off, 'F' = 255,
//! ...                            whitespace between digits allowed
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | The 25×25 [`Grid`] value type |
//! | `level` | Sixteen-step quantization ([`Level`]) |
//! | `codec` | [`decode`], [`encode`] and friends |
//! | `validate` | Strict [`validate`] and [`ValidationResult`] |

// ============================================================================
// Submodules
// ============================================================================

/// Text encoding and decoding.
pub mod codec;

/// Fixed-size brightness grid.
pub mod grid;

/// Brightness quantization levels.
pub mod level;

/// Strict pattern validation.
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use codec::{decode, decode_strict, encode, encode_compact, is_valid_encoding};
pub use grid::{GRID_SIZE, Grid, TOTAL_PIXELS};
pub use level::{Level, quantize};
pub use validate::{InvalidReason, ValidationResult, validate};
