//! Compiled, type-bound encode/decode procedures.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bytestream::{ByteSink, ByteSource};
use shape::{layout_hash, Layout, TypeKey};

use crate::error::CodecResult;
use crate::limits::CodecLimits;

pub(crate) type EncodeFn =
    Arc<dyn Fn(&dyn Any, &mut dyn ByteSink) -> CodecResult<()> + Send + Sync>;

pub(crate) type DecodeFn =
    Arc<dyn Fn(&mut dyn ByteSource, &CodecLimits) -> CodecResult<Box<dyn Any>> + Send + Sync>;

pub(crate) fn encoder<F>(f: F) -> EncodeFn
where
    F: Fn(&dyn Any, &mut dyn ByteSink) -> CodecResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn decoder<F>(f: F) -> DecodeFn
where
    F: Fn(&mut dyn ByteSource, &CodecLimits) -> CodecResult<Box<dyn Any>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An encode/decode pair.
#[derive(Clone)]
pub(crate) struct Plan {
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
}

/// The cached codec of one type.
///
/// Immutable once built and shared through `Arc` across threads.
pub struct CompiledCodec {
    key: TypeKey,
    shape: &'static str,
    layout: Layout,
    fingerprint: u64,
    plan: Plan,
    payload: Option<Plan>,
}

impl CompiledCodec {
    pub(crate) fn new(
        key: TypeKey,
        shape: &'static str,
        layout: Layout,
        plan: Plan,
        payload: Option<Plan>,
    ) -> Self {
        let fingerprint = layout_hash(&layout);
        Self {
            key,
            shape,
            layout,
            fingerprint,
            plan,
            payload,
        }
    }

    /// Encodes `value`, which must be of this codec's type.
    pub fn encode(&self, value: &dyn Any, sink: &mut dyn ByteSink) -> CodecResult<()> {
        (self.plan.encode)(value, sink)
    }

    /// Decodes one value of this codec's type.
    pub fn decode(
        &self,
        source: &mut dyn ByteSource,
        limits: &CodecLimits,
    ) -> CodecResult<Box<dyn Any>> {
        (self.plan.decode)(source, limits)
    }

    #[must_use]
    pub const fn key(&self) -> TypeKey {
        self.key
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Name of the shape this codec was built for.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        self.shape
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Structural hash of [`layout`](Self::layout).
    #[must_use]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Returns `true` if encoded values start with a presence byte.
    #[must_use]
    pub const fn is_presence_wrapped(&self) -> bool {
        self.payload.is_some()
    }

    pub(crate) const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The encoding after the presence byte, for presence-wrapped codecs.
    pub(crate) const fn payload(&self) -> Option<&Plan> {
        self.payload.as_ref()
    }
}

impl fmt::Debug for CompiledCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCodec")
            .field("type", &self.key.name())
            .field("shape", &self.shape)
            .field("fingerprint", &format_args!("0x{:016X}", self.fingerprint))
            .finish_non_exhaustive()
    }
}
