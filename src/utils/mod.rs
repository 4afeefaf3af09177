//! Internal data-structure utilities.
//!
//! Currently just the [`Slab`] used by the reactor to key descriptor
//! registrations by small, reusable tokens.

mod slab;

pub(crate) use slab::Slab;
