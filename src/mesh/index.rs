//! Index types for mesh elements.
//!
//! Vertices and faces are addressed through distinct newtypes so a face index
//! can never be handed to a vertex accessor by mistake. Both wrap a `u32`,
//! which is what hosts typically use for element indices.

use std::fmt::{self, Debug};

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit in a `u32`.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large for u32", index);
                Self(index as u32)
            }

            /// Get the index as a `usize`.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw `u32` value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert_eq!(v.raw(), 42u32);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexId::new(7)), "V(7)");
        assert_eq!(format!("{:?}", FaceId::from(3)), "F(3)");
    }
}
