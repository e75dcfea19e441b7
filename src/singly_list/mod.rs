use std::marker::PhantomData;
use std::ptr::{self, NonNull};
use std::{fmt, mem};

use crate::allocator::{Allocator, DefaultAllocator};
use crate::dispose::Disposer;
use crate::error::{ListError, Result};

mod iter;
mod node;

pub use iter::{Iter, IterMut};
pub use node::Node;

/// Singly linked list with the default allocator.
pub type DefaultSinglyList<T> = SinglyList<T, DefaultAllocator>;

/// A generic singly linked list.
///
/// Insertion and removal are positioned relative to an anchor node; an
/// absent anchor addresses the head. Anchor-taking operations are `unsafe`
/// because anchor validity is the caller's obligation — handles come from
/// `insert_after`, `head`, `tail`, or `Node::next`, and die with the node
/// they name.
pub struct SinglyList<T, A: Allocator = DefaultAllocator> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    disposer: Option<Disposer<T>>,
    allocator: A,
}

impl<T, A: Allocator + Default> SinglyList<T, A> {
    /// Create a new, empty list.
    pub fn new() -> Self {
        Self::new_in(A::default())
    }

    /// Create a new, empty list whose remaining elements are passed to
    /// `disposer` when the list is cleared or dropped.
    pub fn with_disposer(disposer: impl FnMut(T) + 'static) -> Self {
        Self::with_disposer_in(disposer, A::default())
    }
}

impl<T, A: Allocator> SinglyList<T, A> {
    /// Create a new, empty list inside `allocator`.
    pub fn new_in(allocator: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            disposer: None,
            allocator,
        }
    }

    /// Create a new, empty list inside `allocator`, with a teardown
    /// disposer.
    pub fn with_disposer_in(disposer: impl FnMut(T) + 'static, allocator: A) -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            disposer: Some(Box::new(disposer)),
            allocator,
        }
    }

    /// The number of elements in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// If the list is empty or not
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle to the first node, if any
    pub fn head(&self) -> Option<NonNull<Node<T>>> {
        self.head
    }

    /// Handle to the last node, if any
    pub fn tail(&self) -> Option<NonNull<Node<T>>> {
        self.tail
    }

    /// Whether `node` is the head of this list
    pub fn is_head(&self, node: NonNull<Node<T>>) -> bool {
        self.head == Some(node)
    }

    /// Get a reference to the front value, if any
    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { (*node.as_ptr()).value() })
    }

    /// Get a mutable reference to the front value, if any
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { (*node.as_ptr()).value_mut() })
    }

    /// Get a reference to the back value, if any
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|node| unsafe { (*node.as_ptr()).value() })
    }

    /// Get a mutable reference to the back value, if any
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.tail.map(|node| unsafe { (*node.as_ptr()).value_mut() })
    }

    fn create_node(&mut self, value: T) -> Result<NonNull<Node<T>>> {
        let node = self
            .allocator
            .allocate::<Node<T>>()
            .ok_or(ListError::AllocationFailure)?;
        unsafe {
            node.as_ptr().write(Node { next: None, value });
        }
        Ok(node)
    }

    /// Extracts the value of an already unlinked node and returns the
    /// node's storage to the allocator.
    unsafe fn take_node(&mut self, node: NonNull<Node<T>>) -> T {
        let value = ptr::read(&(*node.as_ptr()).value);
        self.allocator.deallocate(node);
        self.len -= 1;
        value
    }

    /// Insert `value` just after `anchor`, or at the head of the list when
    /// `anchor` is `None`.
    ///
    /// On success the list grows by one and a handle to the new node is
    /// returned; if the anchor was the tail, the new node becomes the tail.
    /// On allocation failure the list is left unmodified.
    ///
    /// # Safety
    /// `anchor`, if present, must be a handle to a live node of this list.
    pub unsafe fn insert_after(
        &mut self,
        anchor: Option<NonNull<Node<T>>>,
        value: T,
    ) -> Result<NonNull<Node<T>>> {
        let new_node = self.create_node(value)?;

        match anchor {
            None => {
                // Insert at the head of the list
                if self.is_empty() {
                    self.tail = Some(new_node);
                }
                (*new_node.as_ptr()).next = self.head;
                self.head = Some(new_node);
            }
            Some(anchor) => {
                // Insert somewhere other than the head
                if (*anchor.as_ptr()).next.is_none() {
                    self.tail = Some(new_node);
                }
                (*new_node.as_ptr()).next = (*anchor.as_ptr()).next;
                (*anchor.as_ptr()).next = Some(new_node);
            }
        }

        self.len += 1;
        Ok(new_node)
    }

    /// Remove the node just after `anchor`, or the head node when `anchor`
    /// is `None`, returning its value.
    ///
    /// # Errors
    /// [`ListError::EmptyList`] if the list has no elements;
    /// [`ListError::NoSuccessor`] if `anchor` is the tail.
    ///
    /// # Safety
    /// `anchor`, if present, must be a handle to a live node of this list.
    pub unsafe fn remove_after(&mut self, anchor: Option<NonNull<Node<T>>>) -> Result<T> {
        let old_node = match anchor {
            None => {
                // Remove from the head of the list
                let old_node = self.head.ok_or(ListError::EmptyList)?;
                self.head = (*old_node.as_ptr()).next;
                if self.head.is_none() {
                    self.tail = None;
                }
                old_node
            }
            Some(anchor) => {
                // Remove from somewhere other than the head
                if self.is_empty() {
                    return Err(ListError::EmptyList);
                }
                let old_node = (*anchor.as_ptr()).next.ok_or(ListError::NoSuccessor)?;
                (*anchor.as_ptr()).next = (*old_node.as_ptr()).next;
                if (*anchor.as_ptr()).next.is_none() {
                    self.tail = Some(anchor);
                }
                old_node
            }
        };

        Ok(self.take_node(old_node))
    }

    /// Remove all elements from this list.
    ///
    /// Each removed value is passed to the disposer registered at
    /// construction, or dropped if there is none. The list stays usable
    /// afterwards.
    pub fn clear(&mut self) {
        while !self.is_empty() {
            if let Ok(value) = unsafe { self.remove_after(None) } {
                match self.disposer.as_mut() {
                    Some(dispose) => dispose(value),
                    None => mem::drop(value),
                }
            }
        }
    }

    /// Return a forward iterator over the list's values
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: self.head,
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Return a mutable forward iterator over the list's values
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            current: self.head,
            len: self.len,
            marker: PhantomData,
        }
    }
}

impl<T, A: Allocator> Drop for SinglyList<T, A> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for SinglyList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator + Default> Default for SinglyList<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends each item at the tail.
///
/// # Panics
/// Panics if node allocation fails; the fallible path is `insert_after`.
impl<T, A: Allocator> Extend<T> for SinglyList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            let tail = self.tail;
            // the anchor is this list's own tail
            unsafe { self.insert_after(tail, item) }.expect("node allocation failed");
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a SinglyList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut SinglyList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
