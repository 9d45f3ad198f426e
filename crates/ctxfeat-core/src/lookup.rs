//! Bounded lookups
//!
//! Window queries and neighbor-offset lookups can fall outside the grid.
//! Instead of a magic index, they return [`Lookup`], which is resolved to a
//! sentinel only where features are assembled.

/// Result of a lookup that may leave the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<T> {
    /// The lookup stayed inside the grid
    InBounds(T),
    /// Some part of the lookup left the grid
    OutOfBounds,
}

impl<T> Lookup<T> {
    #[inline]
    pub fn is_in_bounds(&self) -> bool {
        matches!(self, Lookup::InBounds(_))
    }

    /// Convert to an `Option`
    #[inline]
    pub fn in_bounds(self) -> Option<T> {
        match self {
            Lookup::InBounds(v) => Some(v),
            Lookup::OutOfBounds => None,
        }
    }

    /// Map the in-bounds value
    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::InBounds(v) => Lookup::InBounds(f(v)),
            Lookup::OutOfBounds => Lookup::OutOfBounds,
        }
    }

    /// Chain a second lookup that may also leave the grid
    #[inline]
    pub fn and_then<U, F: FnOnce(T) -> Lookup<U>>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::InBounds(v) => f(v),
            Lookup::OutOfBounds => Lookup::OutOfBounds,
        }
    }

    /// Return the in-bounds value or `sentinel`
    #[inline]
    pub fn resolve(self, sentinel: T) -> T {
        match self {
            Lookup::InBounds(v) => v,
            Lookup::OutOfBounds => sentinel,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::InBounds(v),
            None => Lookup::OutOfBounds,
        }
    }
}

/// Offset `pos` by `delta` and keep it only if it lands in `0..len`.
#[inline]
pub fn offset_index(pos: usize, delta: isize, len: usize) -> Lookup<usize> {
    match pos.checked_add_signed(delta) {
        Some(p) if p < len => Lookup::InBounds(p),
        _ => Lookup::OutOfBounds,
    }
}

/// The uniform-distribution sentinel `1 / nclasses`.
#[inline]
pub fn uniform_sentinel(nclasses: usize) -> f64 {
    1.0 / nclasses as f64
}
