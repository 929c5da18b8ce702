//! Process-wide memo of compiled codecs.

use std::sync::{Arc, OnceLock};

use bytestream::{ByteSink, ByteSource};
use dashmap::DashMap;
use shape::{BinType, TypeKey, TypeRef};
use tracing::{debug, trace};

use crate::builder;
use crate::compiled::CompiledCodec;
use crate::error::{CodecError, CodecResult, ConstructionReason};
use crate::limits::CodecLimits;

/// Compiled codecs keyed by type.
///
/// Entries are inserted once and never replaced or evicted. Builds run
/// without holding any lock; when two threads race on the same type, both
/// observe whichever codec was published first.
#[derive(Debug, Default)]
pub struct CodecCache {
    codecs: DashMap<TypeKey, Arc<CompiledCodec>>,
}

static GLOBAL: OnceLock<CodecCache> = OnceLock::new();

impl CodecCache {
    /// Creates an empty cache, independent of [`CodecCache::global`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the free `serialize`/`deserialize` functions.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    /// Returns the codec for `key` if it has been compiled.
    #[must_use]
    pub fn get(&self, key: TypeKey) -> Option<Arc<CompiledCodec>> {
        self.codecs.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn contains(&self, key: TypeKey) -> bool {
        self.codecs.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Returns the codec for `T`, compiling it on first use.
    pub fn get_or_build<T: BinType>(&self) -> CodecResult<Arc<CompiledCodec>> {
        self.get_or_build_ref(TypeRef::of::<T>())
    }

    /// Returns the codec for `ty`, compiling it and everything it contains on
    /// first use.
    ///
    /// Failures are not cached: an unsupported type fails the same way on
    /// every call.
    pub fn get_or_build_ref(&self, ty: TypeRef) -> CodecResult<Arc<CompiledCodec>> {
        if let Some(codec) = self.get(ty.key()) {
            return Ok(codec);
        }

        let built = match builder::build(self, &ty.resolve()) {
            Ok(built) => built,
            Err(err) => {
                debug!(type_name = ty.name(), error = %err, "codec build failed");
                return Err(err);
            }
        };

        let root = built.codec.key();
        let mut retained = built.codec;
        for codec in built.fresh {
            let published = self.publish(codec);
            if published.key() == root {
                retained = published;
            }
        }
        Ok(retained)
    }

    fn publish(&self, codec: Arc<CompiledCodec>) -> Arc<CompiledCodec> {
        let entry = self.codecs.entry(codec.key()).or_insert_with(|| {
            debug!(
                type_name = codec.type_name(),
                shape = codec.shape(),
                fingerprint = codec.fingerprint(),
                "compiled codec"
            );
            Arc::clone(&codec)
        });
        let retained = Arc::clone(entry.value());
        drop(entry);
        if !Arc::ptr_eq(&retained, &codec) {
            trace!(type_name = codec.type_name(), "codec already published");
        }
        retained
    }

    /// Encodes `value` with this cache's codec for `T`.
    pub fn encode<T: BinType>(&self, value: &T, sink: &mut dyn ByteSink) -> CodecResult<()> {
        self.get_or_build::<T>()?.encode(value, sink)
    }

    /// Decodes one `T` with this cache's codec.
    pub fn decode<T: BinType>(
        &self,
        source: &mut dyn ByteSource,
        limits: &CodecLimits,
    ) -> CodecResult<T> {
        let codec = self.get_or_build::<T>()?;
        let value = codec.decode(source, limits)?;
        value
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| CodecError::ConstructionFailure {
                type_name: codec.type_name(),
                reason: ConstructionReason::AssemblyFailed,
            })
    }
}
