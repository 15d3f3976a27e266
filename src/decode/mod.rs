//! Value codecs.
//!
//! | Codec | Module |
//! |-------|--------|
//! | engine decimal ↔ fixed 96-bit decimal | `decimal` |

mod decimal;

pub use decimal::{from_fixed, to_fixed, NativeDecimal};
