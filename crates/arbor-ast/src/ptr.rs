//! Shared-ownership handles to tree nodes
//!
//! Nodes are produced once by the tree builder and then shared between
//! passes, so handles are reference counted. A [`NodePtr`] grants read and
//! write access to its referent; a [`ConstNodePtr`] shares the same referent
//! and reference count but grants read access only, and nothing converts it
//! back.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Error as _, Serialize, Serializer};

/// Shared-ownership handle to a mutable tree node.
///
/// A handle may be null. Multiple handles may reference the same node; the
/// node is released when the last handle (mutable or read-only) is dropped.
pub struct NodePtr<T> {
    inner: Option<Rc<RefCell<T>>>,
}

/// Shared-ownership handle to a read-only tree node.
///
/// Shares referent and reference count with the [`NodePtr`] it was converted
/// from, but exposes no way to mutate the node:
///
/// ```compile_fail
/// use arbor_ast::ConstNodePtr;
///
/// let ptr = ConstNodePtr::new(1u32);
/// ptr.borrow_mut(); // no such method
/// ```
pub struct ConstNodePtr<T> {
    inner: Option<Rc<RefCell<T>>>,
}

impl<T> NodePtr<T> {
    /// Allocate a fresh node and return the sole handle to it
    pub fn new(node: T) -> Self {
        Self {
            inner: Some(Rc::new(RefCell::new(node))),
        }
    }

    /// A handle that references nothing
    pub fn null() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of handles sharing the referent, zero for a null handle
    pub fn strong_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    /// Shared borrow of the referent, `None` for a null handle.
    ///
    /// Panics if the node is currently mutably borrowed.
    pub fn borrow(&self) -> Option<Ref<'_, T>> {
        self.inner.as_ref().map(|rc| rc.borrow())
    }

    /// Exclusive borrow of the referent, `None` for a null handle.
    ///
    /// Panics if the node is currently borrowed elsewhere.
    pub fn borrow_mut(&self) -> Option<RefMut<'_, T>> {
        self.inner.as_ref().map(|rc| rc.borrow_mut())
    }

    /// Read-only-qualified handle to the same referent.
    ///
    /// The result shares the referent and its reference count with `self`.
    pub fn as_const(&self) -> ConstNodePtr<T> {
        ConstNodePtr {
            inner: self.inner.clone(),
        }
    }

    /// Whether both handles reference the same node. Null handles compare
    /// equal to each other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> ConstNodePtr<T> {
    /// Allocate a fresh node that is read-only from birth
    pub fn new(node: T) -> Self {
        Self {
            inner: Some(Rc::new(RefCell::new(node))),
        }
    }

    /// A handle that references nothing
    pub fn null() -> Self {
        Self { inner: None }
    }

    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Number of handles sharing the referent, zero for a null handle
    pub fn strong_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Rc::strong_count)
    }

    /// Shared borrow of the referent, `None` for a null handle.
    ///
    /// Panics if the node is currently mutably borrowed through a
    /// [`NodePtr`] sharing the referent.
    pub fn borrow(&self) -> Option<Ref<'_, T>> {
        self.inner.as_ref().map(|rc| rc.borrow())
    }

    /// Whether both handles reference the same node. Null handles compare
    /// equal to each other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

/// Consuming conversion: transfers the referent without touching the
/// reference count.
impl<T> From<NodePtr<T>> for ConstNodePtr<T> {
    fn from(ptr: NodePtr<T>) -> Self {
        Self { inner: ptr.inner }
    }
}

fn ptr_eq<T>(a: &Option<Rc<RefCell<T>>>, b: &Option<Rc<RefCell<T>>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// Clone/Default by hand: neither requires `T: Clone` or `T: Default`.

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for ConstNodePtr<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for NodePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Default for ConstNodePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

// Equality is referent identity, within and across the two handle types.

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for NodePtr<T> {}

impl<T> PartialEq for ConstNodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Eq for ConstNodePtr<T> {}

impl<T> PartialEq<ConstNodePtr<T>> for NodePtr<T> {
    fn eq(&self, other: &ConstNodePtr<T>) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> PartialEq<NodePtr<T>> for ConstNodePtr<T> {
    fn eq(&self, other: &NodePtr<T>) -> bool {
        ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for NodePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_ptr("NodePtr", &self.inner, f)
    }
}

impl<T: fmt::Debug> fmt::Debug for ConstNodePtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_ptr("ConstNodePtr", &self.inner, f)
    }
}

fn debug_ptr<T: fmt::Debug>(
    name: &str,
    inner: &Option<Rc<RefCell<T>>>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match inner {
        None => write!(f, "{name}(null)"),
        Some(rc) => match rc.try_borrow() {
            Ok(node) => f.debug_tuple(name).field(&*node).finish(),
            Err(_) => write!(f, "{name}(<mutably borrowed>)"),
        },
    }
}

// Handles serialize as `Option<T>`: null becomes `None`, otherwise the node
// value itself. Deserialization allocates a fresh referent per handle.

impl<T: Serialize> Serialize for NodePtr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ptr(&self.inner, serializer)
    }
}

impl<T: Serialize> Serialize for ConstNodePtr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_ptr(&self.inner, serializer)
    }
}

fn serialize_ptr<T: Serialize, S: Serializer>(
    inner: &Option<Rc<RefCell<T>>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match inner {
        None => serializer.serialize_none(),
        Some(rc) => match rc.try_borrow() {
            Ok(node) => serializer.serialize_some(&*node),
            Err(_) => Err(S::Error::custom("node is mutably borrowed")),
        },
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NodePtr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(node) => NodePtr::new(node),
            None => NodePtr::null(),
        })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ConstNodePtr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(node) => ConstNodePtr::new(node),
            None => ConstNodePtr::null(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_null() {
        let ptr = NodePtr::new(7);
        assert!(!ptr.is_null());
        assert_eq!(ptr.strong_count(), 1);
        assert_eq!(*ptr.borrow().unwrap(), 7);

        let null = NodePtr::<i32>::null();
        assert!(null.is_null());
        assert_eq!(null.strong_count(), 0);
        assert!(null.borrow().is_none());
        assert!(null.borrow_mut().is_none());
    }

    #[test]
    fn test_clone_shares_referent() {
        let a = NodePtr::new("node");
        let b = a.clone();
        assert_eq!(a.strong_count(), 2);
        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_as_const_shares_referent_and_count() {
        let ptr = NodePtr::new(3);
        let cptr = ptr.as_const();
        assert_eq!(ptr.strong_count(), 2);
        assert_eq!(cptr.strong_count(), 2);
        assert!(ptr == cptr);
        assert_eq!(*cptr.borrow().unwrap(), 3);
    }

    #[test]
    fn test_consuming_conversion_keeps_count() {
        let ptr = NodePtr::new(3);
        let cptr = ConstNodePtr::from(ptr);
        assert_eq!(cptr.strong_count(), 1);
    }

    #[test]
    fn test_mutation_visible_through_const_handle() {
        let ptr = NodePtr::new(1);
        let cptr = ptr.as_const();
        *ptr.borrow_mut().unwrap() = 2;
        assert_eq!(*cptr.borrow().unwrap(), 2);
    }

    #[test]
    fn test_null_handles_compare_equal() {
        assert_eq!(NodePtr::<i32>::null(), NodePtr::null());
        assert!(NodePtr::<i32>::null() == ConstNodePtr::null());
        assert!(NodePtr::<i32>::null() != NodePtr::new(0));
    }

    #[test]
    fn test_distinct_nodes_compare_unequal() {
        // Identity, not value: equal contents in separate allocations differ.
        let a = NodePtr::new(5);
        let b = NodePtr::new(5);
        assert_ne!(a, b);
        assert!(a != b.as_const());
    }

    #[test]
    fn test_referent_released_with_last_handle() {
        let a = NodePtr::new(9);
        let b = a.as_const();
        drop(a);
        assert_eq!(b.strong_count(), 1);
        assert_eq!(*b.borrow().unwrap(), 9);
    }

    #[test]
    fn test_default_is_null() {
        assert!(NodePtr::<i32>::default().is_null());
        assert!(ConstNodePtr::<i32>::default().is_null());
    }
}
