//! Frozen node sequences with cached read-only views
//!
//! Generic containers over [`NodePtr<T>`] and [`ConstNodePtr<T>`] are
//! unrelated types even though every element of the first converts to an
//! element of the second. [`NodeSeq`] bridges the two: it owns a sequence of
//! mutable handles and derives the read-only sequence element-wise at
//! construction, so downstream code written against either element type (or
//! against [`ConstNodeSeq`]) is served in O(1) afterwards.
//!
//! Both containers are frozen on construction: elements can never be pushed,
//! removed, or replaced, only the whole value rebuilt. The cache therefore
//! stays valid for the container's entire lifetime.

use std::fmt;
use std::ops::Index;
use std::slice;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::OutOfBounds;
use crate::ptr::{ConstNodePtr, NodePtr};

/// Ordered sequence of mutable node handles, frozen on construction.
///
/// Building one costs a single element-wise pass to derive the read-only
/// cache; every later hand-off to read-only consumers is O(1). Element order,
/// duplicates and null handles are preserved exactly.
///
/// ```
/// use arbor_ast::{NodePtr, NodeSeq};
///
/// let seq: NodeSeq<&str> = vec![NodePtr::new("lhs"), NodePtr::new("rhs")].into();
/// assert_eq!(seq.len(), 2);
/// assert!(seq.nodes()[0] == seq.const_nodes()[0]);
/// ```
///
/// There is no way to grow or edit a sequence in place:
///
/// ```compile_fail
/// use arbor_ast::{NodePtr, NodeSeq};
///
/// let seq: NodeSeq<u32> = vec![NodePtr::new(1)].into();
/// seq.push(NodePtr::new(2)); // no such method
/// ```
pub struct NodeSeq<T> {
    nodes: Vec<NodePtr<T>>,
    // Derived once from `nodes`; same length, same referents. Freezing the
    // element set is what keeps this cache valid, so no mutating accessor
    // over `nodes` may ever be added.
    cached: ConstNodeSeq<T>,
}

/// Ordered sequence of read-only node handles.
///
/// The terminal representation: nothing converts it back to a mutable
/// sequence.
///
/// ```compile_fail
/// use arbor_ast::{ConstNodeSeq, NodeSeq};
///
/// let seq = ConstNodeSeq::<u32>::new();
/// let back: NodeSeq<u32> = seq.into(); // no such conversion
/// ```
pub struct ConstNodeSeq<T> {
    nodes: Vec<ConstNodePtr<T>>,
}

impl<T> NodeSeq<T> {
    /// An empty sequence
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            cached: ConstNodeSeq::new(),
        }
    }

    /// The mutable handles, for inspection and iteration only
    pub fn nodes(&self) -> &[NodePtr<T>] {
        &self.nodes
    }

    /// The cached read-only handles, element-for-element the same referents
    /// as [`nodes`](Self::nodes)
    pub fn const_nodes(&self) -> &[ConstNodePtr<T>] {
        self.cached.nodes()
    }

    /// The cached read-only view of this sequence
    pub fn as_const(&self) -> &ConstNodeSeq<T> {
        &self.cached
    }

    /// A standalone read-only view sharing all referents with `self`
    pub fn to_const(&self) -> ConstNodeSeq<T> {
        self.cached.clone()
    }

    /// Consume the sequence, returning the mutable handles
    pub fn into_nodes(self) -> Vec<NodePtr<T>> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NodePtr<T>> {
        self.nodes.get(index)
    }

    /// Like [`get`](Self::get), but reports the failing index and length
    pub fn try_get(&self, index: usize) -> Result<&NodePtr<T>, OutOfBounds> {
        self.nodes.get(index).ok_or(OutOfBounds {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn iter(&self) -> slice::Iter<'_, NodePtr<T>> {
        self.nodes.iter()
    }
}

impl<T> ConstNodeSeq<T> {
    /// An empty sequence
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// The read-only handles
    pub fn nodes(&self) -> &[ConstNodePtr<T>] {
        &self.nodes
    }

    /// Consume the sequence, returning the read-only handles
    pub fn into_nodes(self) -> Vec<ConstNodePtr<T>> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ConstNodePtr<T>> {
        self.nodes.get(index)
    }

    /// Like [`get`](Self::get), but reports the failing index and length
    pub fn try_get(&self, index: usize) -> Result<&ConstNodePtr<T>, OutOfBounds> {
        self.nodes.get(index).ok_or(OutOfBounds {
            index,
            len: self.nodes.len(),
        })
    }

    pub fn iter(&self) -> slice::Iter<'_, ConstNodePtr<T>> {
        self.nodes.iter()
    }
}

// Construction. A NodeSeq derives its cache here and nowhere else; the
// element-wise conversion runs exactly once per sequence.

impl<T> From<Vec<NodePtr<T>>> for NodeSeq<T> {
    fn from(nodes: Vec<NodePtr<T>>) -> Self {
        let cached = ConstNodeSeq::from(nodes.as_slice());
        Self { nodes, cached }
    }
}

impl<T> From<&[NodePtr<T>]> for NodeSeq<T> {
    fn from(nodes: &[NodePtr<T>]) -> Self {
        Self::from(nodes.to_vec())
    }
}

impl<T> FromIterator<NodePtr<T>> for NodeSeq<T> {
    fn from_iter<I: IntoIterator<Item = NodePtr<T>>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> From<Vec<ConstNodePtr<T>>> for ConstNodeSeq<T> {
    fn from(nodes: Vec<ConstNodePtr<T>>) -> Self {
        Self { nodes }
    }
}

impl<T> From<&[ConstNodePtr<T>]> for ConstNodeSeq<T> {
    fn from(nodes: &[ConstNodePtr<T>]) -> Self {
        Self {
            nodes: nodes.to_vec(),
        }
    }
}

/// Element-wise read-only-qualifying conversion, transferring each handle
/// without touching its reference count.
impl<T> From<Vec<NodePtr<T>>> for ConstNodeSeq<T> {
    fn from(nodes: Vec<NodePtr<T>>) -> Self {
        Self {
            nodes: nodes.into_iter().map(ConstNodePtr::from).collect(),
        }
    }
}

/// Element-wise read-only-qualifying conversion, sharing each referent with
/// the source slice.
impl<T> From<&[NodePtr<T>]> for ConstNodeSeq<T> {
    fn from(nodes: &[NodePtr<T>]) -> Self {
        Self {
            nodes: nodes.iter().map(NodePtr::as_const).collect(),
        }
    }
}

impl<T> FromIterator<ConstNodePtr<T>> for ConstNodeSeq<T> {
    fn from_iter<I: IntoIterator<Item = ConstNodePtr<T>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<T> FromIterator<NodePtr<T>> for ConstNodeSeq<T> {
    fn from_iter<I: IntoIterator<Item = NodePtr<T>>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().map(ConstNodePtr::from).collect(),
        }
    }
}

/// Hand-off of the wrapped read-only view; reuses the cache instead of
/// converting again.
impl<T> From<NodeSeq<T>> for ConstNodeSeq<T> {
    fn from(seq: NodeSeq<T>) -> Self {
        seq.cached
    }
}

// Read access. Indexing panics on out-of-range like any slice; `get` and
// `try_get` are the non-panicking paths.

impl<T> Index<usize> for NodeSeq<T> {
    type Output = NodePtr<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<T> Index<usize> for ConstNodeSeq<T> {
    type Output = ConstNodePtr<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<'a, T> IntoIterator for &'a NodeSeq<T> {
    type Item = &'a NodePtr<T>;
    type IntoIter = slice::Iter<'a, NodePtr<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<'a, T> IntoIterator for &'a ConstNodeSeq<T> {
    type Item = &'a ConstNodePtr<T>;
    type IntoIter = slice::Iter<'a, ConstNodePtr<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// AsRef lets one generic bound accept a NodeSeq in any of its
// representations.

impl<T> AsRef<[NodePtr<T>]> for NodeSeq<T> {
    fn as_ref(&self) -> &[NodePtr<T>] {
        &self.nodes
    }
}

impl<T> AsRef<[ConstNodePtr<T>]> for NodeSeq<T> {
    fn as_ref(&self) -> &[ConstNodePtr<T>] {
        self.cached.nodes()
    }
}

impl<T> AsRef<ConstNodeSeq<T>> for NodeSeq<T> {
    fn as_ref(&self) -> &ConstNodeSeq<T> {
        &self.cached
    }
}

impl<T> AsRef<[ConstNodePtr<T>]> for ConstNodeSeq<T> {
    fn as_ref(&self) -> &[ConstNodePtr<T>] {
        &self.nodes
    }
}

// Clone/Default/Eq/Debug by hand: none requires extra bounds on `T`, and
// cloning must preserve referent identity rather than duplicate nodes.

impl<T> Clone for NodeSeq<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            cached: self.cached.clone(),
        }
    }
}

impl<T> Clone for ConstNodeSeq<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<T> Default for NodeSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Default for ConstNodeSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for NodeSeq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<T> Eq for NodeSeq<T> {}

impl<T> PartialEq for ConstNodeSeq<T> {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<T> Eq for ConstNodeSeq<T> {}

impl<T: fmt::Debug> fmt::Debug for NodeSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl<T: fmt::Debug> fmt::Debug for ConstNodeSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

// Sequences serialize as plain lists of optional nodes. Deserialization goes
// through the normal constructors, so a NodeSeq rebuilds its cache on the
// way in.

impl<T: Serialize> Serialize for NodeSeq<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<T: Serialize> Serialize for ConstNodeSeq<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NodeSeq<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<NodePtr<T>>::deserialize(deserializer).map(Self::from)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ConstNodeSeq<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<ConstNodePtr<T>>::deserialize(deserializer).map(Self::from)
    }
}
