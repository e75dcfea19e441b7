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

/// Circular linked list with the default allocator.
pub type DefaultCircularList<T> = CircularList<T, DefaultAllocator>;

/// A generic circular singly linked list.
///
/// The last node's successor is the head, and a sole node is its own
/// successor, so there is no tail: "last" means the node whose `next` is
/// the head. An absent anchor is accepted only by the very first insertion;
/// from then on every operation is anchored at a concrete node, which makes
/// both insertion and removal O(1) anywhere in the ring.
pub struct CircularList<T, A: Allocator = DefaultAllocator> {
    head: Option<NonNull<Node<T>>>,
    len: usize,
    disposer: Option<Disposer<T>>,
    allocator: A,
}

impl<T, A: Allocator + Default> CircularList<T, A> {
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

impl<T, A: Allocator> CircularList<T, A> {
    /// Create a new, empty list inside `allocator`.
    pub fn new_in(allocator: A) -> Self {
        Self {
            head: None,
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

    /// Handle to the head node, if any
    pub fn head(&self) -> Option<NonNull<Node<T>>> {
        self.head
    }

    /// Whether `node` is the head of this list
    pub fn is_head(&self, node: NonNull<Node<T>>) -> bool {
        self.head == Some(node)
    }

    /// Get a reference to the head value, if any
    pub fn front(&self) -> Option<&T> {
        self.head.map(|node| unsafe { (*node.as_ptr()).value() })
    }

    /// Get a mutable reference to the head value, if any
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.head.map(|node| unsafe { (*node.as_ptr()).value_mut() })
    }

    /// Extracts the value of an already unlinked node and returns the
    /// node's storage to the allocator.
    unsafe fn take_node(&mut self, node: NonNull<Node<T>>) -> T {
        let value = ptr::read(&(*node.as_ptr()).value);
        self.allocator.deallocate(node);
        self.len -= 1;
        value
    }

    /// Insert `value` just after `anchor`.
    ///
    /// The first insertion into an empty list takes no anchor: the sole
    /// node becomes the head, linked to itself. Once the list is non-empty
    /// an absent anchor is rejected with [`ListError::InvalidAnchor`] —
    /// there is no defined "insert at head" position in a ring. A concrete
    /// anchor on an empty list is rejected the same way.
    ///
    /// On success the list grows by one and a handle to the new node is
    /// returned. On failure the list is left unmodified.
    ///
    /// # Safety
    /// `anchor`, if present, must be a handle to a live node of this list.
    pub unsafe fn insert_after(
        &mut self,
        anchor: Option<NonNull<Node<T>>>,
        value: T,
    ) -> Result<NonNull<Node<T>>> {
        // Validate the anchor before allocating anything
        let target = match (self.head, anchor) {
            (None, None) => None,
            (Some(_), Some(anchor)) => Some(anchor),
            _ => return Err(ListError::InvalidAnchor),
        };

        let new_node = self
            .allocator
            .allocate::<Node<T>>()
            .ok_or(ListError::AllocationFailure)?;

        match target {
            None => {
                // Sole node: its own successor, and the head
                new_node.as_ptr().write(Node {
                    next: new_node,
                    value,
                });
                self.head = Some(new_node);
            }
            Some(anchor) => {
                new_node.as_ptr().write(Node {
                    next: (*anchor.as_ptr()).next,
                    value,
                });
                (*anchor.as_ptr()).next = new_node;
            }
        }

        self.len += 1;
        Ok(new_node)
    }

    /// Remove the node just after `anchor`, returning its value.
    ///
    /// Removing the sole node empties the list; removing the node that is
    /// currently the head advances the head to the removed node's
    /// successor.
    ///
    /// # Errors
    /// [`ListError::EmptyList`] if the list has no elements.
    ///
    /// # Safety
    /// `anchor` must be a handle to a live node of this list.
    pub unsafe fn remove_after(&mut self, anchor: NonNull<Node<T>>) -> Result<T> {
        if self.is_empty() {
            return Err(ListError::EmptyList);
        }

        let old_node = (*anchor.as_ptr()).next;

        if old_node == anchor {
            // The anchor is its own successor: removing the last node
            self.head = None;
        } else {
            (*anchor.as_ptr()).next = (*old_node.as_ptr()).next;
            if Some(old_node) == self.head {
                self.head = Some((*old_node.as_ptr()).next);
            }
        }

        Ok(self.take_node(old_node))
    }

    /// Remove all elements from this list.
    ///
    /// Teardown repeatedly removes the head's successor, so the head value
    /// is the last one handed to the disposer. The list stays usable
    /// afterwards.
    pub fn clear(&mut self) {
        while let Some(head) = self.head {
            if let Ok(value) = unsafe { self.remove_after(head) } {
                match self.disposer.as_mut() {
                    Some(dispose) => dispose(value),
                    None => mem::drop(value),
                }
            }
        }
    }

    /// Return an iterator that yields each value once, starting at the head
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: self.head,
            remaining: self.len,
            marker: PhantomData,
        }
    }

    /// Return a mutable iterator that yields each value once, starting at
    /// the head
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            current: self.head,
            remaining: self.len,
            marker: PhantomData,
        }
    }
}

impl<T, A: Allocator> Drop for CircularList<T, A> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for CircularList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator + Default> Default for CircularList<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a CircularList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut CircularList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
