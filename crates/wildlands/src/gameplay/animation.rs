//! Skeletal animation collaborator.
//!
//! Purely visual. Loading can fail; the entity keeps simulating either way.

use crate::error::AssetError;

/// Opaque skeleton handle issued by an [`AnimationLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkeletonHandle(pub u32);

/// Opaque animation set handle issued by an [`AnimationLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u32);

/// Clip played while the entity moves.
pub const CLIP_WALK: &str = "Walk";

/// Clip played while the entity stands still.
pub const CLIP_IDLE: &str = "Idle";

/// Loads skeletons and animations by path.
pub trait AnimationLibrary {
    /// Loads a skeleton.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the skeleton cannot be loaded.
    fn load_skeleton(&mut self, path: &str) -> Result<SkeletonHandle, AssetError>;

    /// Loads an animation set targeting `skeleton`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssetError`] if the animation cannot be loaded or does
    /// not fit the skeleton.
    fn load_animation(
        &mut self,
        skeleton: SkeletonHandle,
        path: &str,
    ) -> Result<AnimationHandle, AssetError>;
}

/// Skeleton + animation set bound to one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationBinding {
    /// Skeleton used for skinning.
    pub skeleton: SkeletonHandle,
    /// Animation set holding the named clips.
    pub animations: AnimationHandle,
}

impl AnimationBinding {
    /// Loads both assets.
    ///
    /// # Errors
    ///
    /// Propagates the first [`AssetError`] from the library.
    pub fn load(
        library: &mut dyn AnimationLibrary,
        skeleton_path: &str,
        animation_path: &str,
    ) -> Result<Self, AssetError> {
        let skeleton = library.load_skeleton(skeleton_path)?;
        let animations = library.load_animation(skeleton, animation_path)?;
        Ok(Self {
            skeleton,
            animations,
        })
    }
}
