// Type-safe asset handles

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Unique identifier for a loaded asset
///
/// Derived from the asset's source files, so loading the same files twice
/// yields the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(u64);

impl AssetId {
    /// Identify an asset by the files and parameters it was built from
    pub fn from_parts(parts: &[&str]) -> Self {
        let mut hasher = DefaultHasher::new();
        for part in parts {
            part.hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Read-only handle to an asset owned by the `AssetManager`
///
/// The `T` parameter keeps sheet and map handles apart.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle<T> {
    id: AssetId,
    _phantom: PhantomData<T>,
}

// Manual impls: the marker types themselves are not Copy.
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> AssetHandle<T> {
    pub(crate) fn new(id: AssetId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }
}

/// Marker for sprite sheets
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SheetAsset;

/// Marker for rasterized tile maps
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MapAsset;

pub type SheetHandle = AssetHandle<SheetAsset>;
pub type MapHandle = AssetHandle<MapAsset>;
