//! The decoder capability trait and the built-in decoders.
//!
//! A [`Decoder`] claims the shapes it can produce through [`Decoder::supports`]
//! and is picked from a [`crate::DecoderRegistry`] by priority. Leaf and
//! collection decoders implement [`NullHandlingDecoder`] instead and are
//! registered wrapped in [`NullHandling`], which deals with null and absent
//! nodes before they ever see them.

mod collections;
mod enums;
mod nulls;
mod paths;
mod primitives;
mod structured;

pub use collections::{ListDecoder, MapDecoder, SetDecoder};
pub use enums::EnumDecoder;
pub use nulls::{NullHandling, NullHandlingDecoder};
pub use paths::PathDecoder;
pub use primitives::{BooleanDecoder, DoubleDecoder, IntDecoder, LongDecoder, StringDecoder};
pub use structured::StructuredDecoder;

use crate::context::DecoderContext;
use crate::node::Node;
use crate::result::ConfigResult;
use crate::shape::Shape;
use crate::value::Value;

/// Converts a [`Node`] into a [`Value`] of a given [`Shape`].
///
/// Decoders are stateless and shared between threads. Nested values are
/// decoded by resolving another decoder through the context, never by
/// calling a concrete decoder directly.
pub trait Decoder: Send + Sync {
    fn supports(&self, shape: &Shape) -> bool;

    /// Tie-breaker between decoders supporting the same shape. Higher wins.
    fn priority(&self) -> i32 {
        0
    }

    fn decode(&self, node: &Node, shape: &Shape, ctx: &DecoderContext) -> ConfigResult<Value>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
