use num_traits::{One, PrimInt};

/// Trait implemented by flag enums whose discriminant (via `#[repr(u8)]`) is the bit index.
///
/// The backing integer is chosen through the associated `Storage`.
pub trait FlagBit {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitfield of [`FlagBit`] values.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Flags<T: PrimInt> {
    bits: T,
}

impl<T: PrimInt> Flags<T> {
    pub fn insert<U: FlagBit<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits | flag.mask();
    }

    pub fn remove<U: FlagBit<Storage = T>>(&mut self, flag: U) {
        self.bits = self.bits & !flag.mask();
    }

    pub fn set<U: FlagBit<Storage = T>>(&mut self, flag: U, on: bool) {
        if on {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    #[inline]
    pub fn contains<U: FlagBit<Storage = T>>(&self, flag: U) -> bool {
        (self.bits & flag.mask()) != T::zero()
    }

    /// Keep only the bits present in `mask`.
    #[inline]
    pub fn masked(&self, mask: T) -> T {
        self.bits & mask
    }
}

/// Declare a `#[repr(u8)]` flag enum and implement [`FlagBit`] for it.
///
/// ```ignore
/// define_flags!(BodyFlag, u16, { Sleeping, Sensor });
/// ```
#[macro_export]
macro_rules! define_flags {
    ($name:ident, $storage:ty, { $($(#[$meta:meta])* $variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$meta])* $variant),*
        }

        impl $crate::flags::FlagBit for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_flags!(ShapeFlag, u8, {
    /// Pose changed since the AABB was last computed.
    Dirty,
    Box,
    Sphere,
    /// Immovable; infinite mass for the solver.
    Static,
});

/// Per-entity shape kind and state bits.
pub type ShapeFlags = Flags<u8>;

/// Mask selecting the shape-kind bits (BOX | SPHERE).
pub const SHAPE_BITS: u8 = (1 << ShapeFlag::Box as u8) | (1 << ShapeFlag::Sphere as u8);

impl ShapeFlags {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.contains(ShapeFlag::Static)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.contains(ShapeFlag::Dirty)
    }

    /// Shape-kind bits only.
    #[inline]
    pub fn shape_bits(&self) -> u8 {
        self.masked(SHAPE_BITS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_bits_ignore_state_flags() {
        let mut f = ShapeFlags::default();
        f.insert(ShapeFlag::Box);
        f.insert(ShapeFlag::Static);
        f.insert(ShapeFlag::Dirty);

        assert_eq!(f.shape_bits(), ShapeFlag::Box.mask());
        assert!(f.is_static());
        assert!(f.is_dirty());
    }

    #[test]
    fn remove_and_set_toggle_single_bits() {
        let mut f = ShapeFlags::default();
        f.set(ShapeFlag::Dirty, true);
        f.insert(ShapeFlag::Sphere);
        f.remove(ShapeFlag::Dirty);

        assert!(!f.is_dirty());
        assert!(f.contains(ShapeFlag::Sphere));

        f.set(ShapeFlag::Sphere, false);
        assert_eq!(f, ShapeFlags::default());
    }

    #[test]
    fn shape_bits_mask_covers_exactly_box_and_sphere() {
        assert_eq!(
            SHAPE_BITS,
            ShapeFlag::Box.mask() | ShapeFlag::Sphere.mask()
        );
        assert_eq!(SHAPE_BITS & ShapeFlag::Static.mask(), 0);
        assert_eq!(SHAPE_BITS & ShapeFlag::Dirty.mask(), 0);
    }
}
