// Copyright 2026 the STARK Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A per-partition R-tree index (`spec.md` §4.4).
//!
//! An [`RTree`] starts life `Mutable`: only [`RTree::insert`] is available.
//! [`RTree::build`] consumes it and bulk-loads an immutable, STR-packed
//! `Built` tree, on which [`RTree::query`], [`RTree::knn`], and
//! [`RTree::within_distance`] become available. The two lifecycle phases are
//! distinct types so a caller cannot accidentally query a tree that hasn't
//! been built, or insert into one that has — except through
//! [`RTreeHandle::insert`], which is implemented for both phases and reports
//! the `Built`-phase misuse as a runtime [`StarkError::Usage`] for code that
//! holds an R-tree generically and does not know its phase statically.

mod build;
mod query;

use std::marker::PhantomData;
use std::num::NonZeroUsize;

use stark_types::{NRectRange, StarkError, StarkResult};

pub use query::WithinDistanceCandidate;

/// Default fanout used by [`RTree::new_default`], per `spec.md` §4.4.
pub const DEFAULT_ORDER: usize = 10;

/// Serde-deserializable wrapper around an [`RTree`]'s fanout, so it can sit
/// alongside a partitioner's own config struct in a config file.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RTreeConfig {
    /// Maximum children per node.
    pub order: NonZeroUsize,
}

impl RTreeConfig {
    /// A config carrying [`DEFAULT_ORDER`].
    pub fn new_default() -> Self {
        Self {
            order: NonZeroUsize::new(DEFAULT_ORDER).expect("DEFAULT_ORDER is nonzero"),
        }
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self::new_default()
    }
}

/// Marker type: the tree only accepts [`RTree::insert`].
#[derive(Debug)]
pub struct Mutable;

/// Marker type: the tree is immutable and queryable.
#[derive(Debug)]
pub struct Built;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Mutable {}
    impl Sealed for super::Built {}
}

/// The two lifecycle phases an [`RTree`] can be in.
pub trait State: sealed::Sealed {}
impl State for Mutable {}
impl State for Built {}

#[derive(Clone, Debug)]
struct Entry<T> {
    mbr: NRectRange,
    payload: T,
}

#[derive(Clone, Debug)]
enum Node {
    Leaf {
        mbr: NRectRange,
        entries: std::ops::Range<usize>,
    },
    Internal {
        mbr: NRectRange,
        children: Vec<usize>,
    },
}

impl Node {
    fn mbr(&self) -> &NRectRange {
        match self {
            Self::Leaf { mbr, .. } | Self::Internal { mbr, .. } => mbr,
        }
    }
}

/// A bulk-loadable R-tree index over `(NRectRange, T)` pairs.
#[derive(Debug)]
pub struct RTree<T, S: State = Mutable> {
    order: NonZeroUsize,
    entries: Vec<Entry<T>>,
    nodes: Vec<Node>,
    root: Option<usize>,
    _state: PhantomData<S>,
}

impl<T> RTree<T, Mutable> {
    /// An empty, mutable tree with the given fanout.
    pub fn new(order: NonZeroUsize) -> Self {
        Self {
            order,
            entries: Vec::new(),
            nodes: Vec::new(),
            root: None,
            _state: PhantomData,
        }
    }

    /// An empty, mutable tree with the default fanout ([`DEFAULT_ORDER`]).
    pub fn new_default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_ORDER).expect("DEFAULT_ORDER is nonzero"))
    }

    /// An empty, mutable tree built from an [`RTreeConfig`].
    pub fn from_config(config: RTreeConfig) -> Self {
        Self::new(config.order)
    }

    /// Insert an entry. Only valid before [`RTree::build`].
    pub fn insert(&mut self, mbr: NRectRange, payload: T) {
        self.entries.push(Entry { mbr, payload });
    }

    /// The number of entries inserted so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any entries have been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bulk-load an immutable, STR-packed tree from the inserted entries.
    pub fn build(self) -> RTree<T, Built> {
        build::bulk_load(self.order, self.entries)
    }
}

impl<T> RTree<T, Built> {
    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The fanout the tree was built with.
    pub fn order(&self) -> NonZeroUsize {
        self.order
    }
}

/// Common insert surface for code that holds an [`RTree`] without knowing
/// its lifecycle phase at compile time (`spec.md` §4.4's "insert after
/// build fails with `UsageError`").
pub trait RTreeHandle<T> {
    /// Insert an entry, failing with [`StarkError::Usage`] if the tree has
    /// already been built.
    fn try_insert(&mut self, mbr: NRectRange, payload: T) -> StarkResult<()>;
}

impl<T> RTreeHandle<T> for RTree<T, Mutable> {
    fn try_insert(&mut self, mbr: NRectRange, payload: T) -> StarkResult<()> {
        self.insert(mbr, payload);
        Ok(())
    }
}

impl<T> RTreeHandle<T> for RTree<T, Built> {
    fn try_insert(&mut self, _mbr: NRectRange, _payload: T) -> StarkResult<()> {
        Err(StarkError::usage("cannot insert into an R-tree after build()"))
    }
}
