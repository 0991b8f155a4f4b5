//! Attribute classes of a mesh and masks over them.
//!
//! A filter declares which attribute classes it can leave stale through an
//! [`AttributeMask`]; the host then recomputes only those classes.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of mesh attribute classes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct AttributeMask(u32);

impl AttributeMask {
    /// No attributes.
    pub const NONE: Self = Self(0);
    /// Vertex positions.
    pub const VERT_COORD: Self = Self(1 << 0);
    /// Per-vertex normals.
    pub const VERT_NORMAL: Self = Self(1 << 1);
    /// Per-face normals.
    pub const FACE_NORMAL: Self = Self(1 << 2);
    /// Bounding box.
    pub const BBOX: Self = Self(1 << 3);
    /// Per-vertex colors.
    pub const VERT_COLOR: Self = Self(1 << 4);
    /// Per-face colors.
    pub const FACE_COLOR: Self = Self(1 << 5);
    /// Face/vertex connectivity and adjacency.
    pub const TOPOLOGY: Self = Self(1 << 6);
    /// Mesh-level metadata (name, transform, user attributes).
    pub const MESH_META: Self = Self(1 << 7);

    const NAMED: [(Self, &'static str); 8] = [
        (Self::VERT_COORD, "VERT_COORD"),
        (Self::VERT_NORMAL, "VERT_NORMAL"),
        (Self::FACE_NORMAL, "FACE_NORMAL"),
        (Self::BBOX, "BBOX"),
        (Self::VERT_COLOR, "VERT_COLOR"),
        (Self::FACE_COLOR, "FACE_COLOR"),
        (Self::TOPOLOGY, "TOPOLOGY"),
        (Self::MESH_META, "MESH_META"),
    ];

    /// Raw bit representation.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Union of two masks, usable in const contexts.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether every class in `other` is also in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether `self` and `other` share any class.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Check whether the mask is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Names of the classes set in this mask, in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for AttributeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for AttributeMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AttributeMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for AttributeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "AttributeMask(NONE)");
        }
        let names: Vec<_> = self.names().collect();
        write!(f, "AttributeMask({})", names.join(" | "))
    }
}

impl fmt::Display for AttributeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<_> = self.names().map(str::to_lowercase).collect();
        write!(f, "{}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let mask = AttributeMask::VERT_COORD | AttributeMask::FACE_NORMAL;
        assert!(mask.contains(AttributeMask::VERT_COORD));
        assert!(mask.contains(AttributeMask::FACE_NORMAL));
        assert!(!mask.contains(AttributeMask::VERT_NORMAL));
        assert!(!mask.contains(AttributeMask::VERT_COORD | AttributeMask::BBOX));
        assert!(mask.intersects(AttributeMask::VERT_COORD | AttributeMask::BBOX));
    }

    #[test]
    fn test_debug_lists_names() {
        let mask = AttributeMask::FACE_NORMAL | AttributeMask::VERT_COORD;
        assert_eq!(format!("{:?}", mask), "AttributeMask(VERT_COORD | FACE_NORMAL)");
        assert_eq!(format!("{:?}", AttributeMask::NONE), "AttributeMask(NONE)");
        assert_eq!(mask.to_string(), "vert_coord, face_normal");
    }
}
