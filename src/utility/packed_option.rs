//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use std::fmt;

/// Helper trait for a type that can be packed into a [`PackedOption`].
///
/// These types need to have some null-ish value that they can reserve,
/// that value will be used to distinguish between `None` and `Some`.
pub trait Packable: Sized {
    /// Gets the reserved value of the type.
    ///
    /// This value is not meant to be constructed normally in any circumstances.
    fn reserved() -> Self;

    /// Checks if the current object is equivalent to the constant
    /// returned by [`Self::reserved`].
    fn is_reserved(&self) -> bool;
}

/// Provides an [`Option`]-like type for (valid) arena keys without paying
/// any extra cost to store the flag. It takes up exactly as much space as
/// the key would on its own.
///
/// Relies on the reserved state of the key to distinguish between "none"
/// and "some".
///
/// ```
/// # use garnet::utility::PackedOption;
/// # use garnet::dense_arena_key;
/// dense_arena_key! { struct K; }
///
/// let none = PackedOption::<K>::none();
/// assert!(none.is_none());
/// assert_eq!(none.expand(), None);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedOption<T: Packable>(T);

impl<T: Packable> PackedOption<T> {
    /// Creates a `None` instance of `PackedOption`.
    pub fn none() -> Self {
        Self(T::reserved())
    }

    /// Creates a `Some` instance holding `value`.
    ///
    /// `value` must not be the reserved null state of `T`.
    pub fn some(value: T) -> Self {
        debug_assert!(!value.is_reserved(), "cannot pack the reserved value");

        Self(value)
    }

    /// Checks whether the option is in the `None` state.
    pub fn is_none(&self) -> bool {
        self.0.is_reserved()
    }

    /// Checks whether the option holds a real value.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Expands the packed representation into a real [`Option`].
    pub fn expand(self) -> Option<T>
    where
        T: Copy,
    {
        if self.is_none() {
            None
        } else {
            Some(self.0)
        }
    }

    /// Unwraps the contained value, panicking if the option is `None`.
    pub fn unwrap(self) -> T {
        assert!(self.is_some(), "unwrapped a none `PackedOption`");

        self.0
    }
}

impl<T: Packable> Default for PackedOption<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T: Packable> From<T> for PackedOption<T> {
    fn from(value: T) -> Self {
        Self::some(value)
    }
}

impl<T: Packable> From<Option<T>> for PackedOption<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => Self::some(inner),
            None => Self::none(),
        }
    }
}

impl<T: Packable + Copy + fmt::Debug> fmt::Debug for PackedOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expand() {
            Some(inner) => write!(f, "Some({inner:?})"),
            None => write!(f, "None"),
        }
    }
}
