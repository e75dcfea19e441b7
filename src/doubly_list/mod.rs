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

/// Doubly linked list with the default allocator.
pub type DefaultDoublyList<T> = DoublyList<T, DefaultAllocator>;

/// A generic doubly linked list.
///
/// Each node links both ways, so any node whose handle the caller holds can
/// be removed in O(1), and insertion can anchor before as well as after a
/// node. An absent anchor is accepted only while the list is empty.
pub struct DoublyList<T, A: Allocator = DefaultAllocator> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    disposer: Option<Disposer<T>>,
    allocator: A,
}

impl<T, A: Allocator + Default> DoublyList<T, A> {
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

impl<T, A: Allocator> DoublyList<T, A> {
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

    /// Resolves the anchor for an insert: an absent anchor is only
    /// meaningful while the list is empty (the sole-element path), and a
    /// concrete anchor is only meaningful once the list has nodes.
    fn check_anchor(
        &self,
        anchor: Option<NonNull<Node<T>>>,
    ) -> Result<Option<NonNull<Node<T>>>> {
        match (self.head, anchor) {
            (None, None) => Ok(None),
            (Some(_), Some(anchor)) => Ok(Some(anchor)),
            _ => Err(ListError::InvalidAnchor),
        }
    }

    fn create_node(
        &mut self,
        value: T,
        prev: Option<NonNull<Node<T>>>,
        next: Option<NonNull<Node<T>>>,
    ) -> Result<NonNull<Node<T>>> {
        let node = self
            .allocator
            .allocate::<Node<T>>()
            .ok_or(ListError::AllocationFailure)?;
        unsafe {
            node.as_ptr().write(Node { next, prev, value });
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

    /// Insert `value` just after `anchor`, or as the sole element when
    /// `anchor` is `None` and the list is empty.
    ///
    /// An absent anchor on a non-empty list — or a concrete anchor on an
    /// empty one — fails with [`ListError::InvalidAnchor`]; that check
    /// precedes allocation, so the list is unmodified on every failure
    /// path. If the anchor was the tail, the new node becomes the tail.
    ///
    /// # Safety
    /// `anchor`, if present, must be a handle to a live node of this list.
    pub unsafe fn insert_after(
        &mut self,
        anchor: Option<NonNull<Node<T>>>,
        value: T,
    ) -> Result<NonNull<Node<T>>> {
        let new_node = match self.check_anchor(anchor)? {
            None => {
                let new_node = self.create_node(value, None, None)?;
                self.head = Some(new_node);
                self.tail = Some(new_node);
                new_node
            }
            Some(anchor) => {
                let next = (*anchor.as_ptr()).next;
                let new_node = self.create_node(value, Some(anchor), next)?;
                match next {
                    None => self.tail = Some(new_node),
                    Some(next) => (*next.as_ptr()).prev = Some(new_node),
                }
                (*anchor.as_ptr()).next = Some(new_node);
                new_node
            }
        };

        self.len += 1;
        Ok(new_node)
    }

    /// Insert `value` just before `anchor`, or as the sole element when
    /// `anchor` is `None` and the list is empty.
    ///
    /// Mirror image of [`insert_after`](Self::insert_after): if the anchor
    /// was the head, the new node becomes the head.
    ///
    /// # Safety
    /// `anchor`, if present, must be a handle to a live node of this list.
    pub unsafe fn insert_before(
        &mut self,
        anchor: Option<NonNull<Node<T>>>,
        value: T,
    ) -> Result<NonNull<Node<T>>> {
        let new_node = match self.check_anchor(anchor)? {
            None => {
                let new_node = self.create_node(value, None, None)?;
                self.head = Some(new_node);
                self.tail = Some(new_node);
                new_node
            }
            Some(anchor) => {
                let prev = (*anchor.as_ptr()).prev;
                let new_node = self.create_node(value, prev, Some(anchor))?;
                match prev {
                    None => self.head = Some(new_node),
                    Some(prev) => (*prev.as_ptr()).next = Some(new_node),
                }
                (*anchor.as_ptr()).prev = Some(new_node);
                new_node
            }
        };

        self.len += 1;
        Ok(new_node)
    }

    /// Remove `node` from the list, returning its value.
    ///
    /// Unlinks in O(1) from both directions; head and tail are fixed up
    /// when the removed node was at either boundary.
    ///
    /// # Errors
    /// [`ListError::EmptyList`] if the list has no elements.
    ///
    /// # Safety
    /// `node` must be a handle to a live node of this list.
    pub unsafe fn remove(&mut self, node: NonNull<Node<T>>) -> Result<T> {
        if self.is_empty() {
            return Err(ListError::EmptyList);
        }

        if Some(node) == self.head {
            // Remove from the head of the list
            self.head = (*node.as_ptr()).next;
            match self.head {
                None => self.tail = None,
                Some(next) => (*next.as_ptr()).prev = None,
            }
        } else {
            // A non-head node always has a predecessor
            debug_assert!((*node.as_ptr()).prev.is_some());
            if let Some(prev) = (*node.as_ptr()).prev {
                (*prev.as_ptr()).next = (*node.as_ptr()).next;
            }
            match (*node.as_ptr()).next {
                None => self.tail = (*node.as_ptr()).prev,
                Some(next) => (*next.as_ptr()).prev = (*node.as_ptr()).prev,
            }
        }

        Ok(self.take_node(node))
    }

    /// Remove all elements from this list.
    ///
    /// Teardown runs tail to head: each removed value is passed to the
    /// disposer registered at construction, or dropped if there is none.
    /// The list stays usable afterwards.
    pub fn clear(&mut self) {
        while let Some(tail) = self.tail {
            if let Ok(value) = unsafe { self.remove(tail) } {
                match self.disposer.as_mut() {
                    Some(dispose) => dispose(value),
                    None => mem::drop(value),
                }
            }
        }
    }

    /// Return a double-ended iterator over the list's values
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.head,
            back: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }

    /// Return a mutable double-ended iterator over the list's values
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.head,
            back: self.tail,
            len: self.len,
            marker: PhantomData,
        }
    }
}

impl<T, A: Allocator> Drop for DoublyList<T, A> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DoublyList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, A: Allocator + Default> Default for DoublyList<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends each item at the tail.
///
/// # Panics
/// Panics if node allocation fails; the fallible path is `insert_after`.
impl<T, A: Allocator> Extend<T> for DoublyList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            let tail = self.tail;
            // the anchor is this list's own tail
            unsafe { self.insert_after(tail, item) }.expect("node allocation failed");
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DoublyList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DoublyList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::doubly_list::{DefaultDoublyList, DoublyList, Node};
    use crate::error::ListError;
    use crate::fixed_pool::FixedPool;

    /// Checks that every adjacent pair links both ways and that the
    /// boundary nodes terminate the chain.
    fn assert_symmetric<T>(list: &DefaultDoublyList<T>) {
        let mut cursor = list.head();
        let mut prev = None;
        let mut count = 0;
        while let Some(node) = cursor {
            assert_eq!(unsafe { node.as_ref() }.prev(), prev);
            prev = Some(node);
            cursor = unsafe { node.as_ref() }.next();
            count += 1;
        }
        assert_eq!(list.tail(), prev);
        assert_eq!(list.len(), count);
    }

    #[test]
    fn empty() {
        let list = DefaultDoublyList::<u32>::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn sole_element_is_head_and_tail() {
        let mut list = DefaultDoublyList::new();
        let node = unsafe { list.insert_after(None, 1u32) }.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.head(), Some(node));
        assert_eq!(list.tail(), Some(node));
        assert!(unsafe { node.as_ref() }.is_first());
        assert!(unsafe { node.as_ref() }.is_last());
        assert_symmetric(&list);
    }

    #[test]
    fn absent_anchor_on_populated_list_is_rejected() {
        let mut list = DefaultDoublyList::new();
        unsafe { list.insert_after(None, 1u32) }.unwrap();

        assert_eq!(
            unsafe { list.insert_after(None, 2) },
            Err(ListError::InvalidAnchor)
        );
        assert_eq!(
            unsafe { list.insert_before(None, 2) },
            Err(ListError::InvalidAnchor)
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn append_at_tail_preserves_order() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 1u32) }.unwrap();
        let second = unsafe { list.insert_after(Some(first), 2u32) }.unwrap();
        let third = unsafe { list.insert_after(Some(second), 3u32) }.unwrap();

        assert_eq!(list.tail(), Some(third));
        itertools::assert_equal(list.iter(), &[1, 2, 3]);
        assert_symmetric(&list);
    }

    #[test]
    fn insert_before_head_becomes_head() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 2u32) }.unwrap();
        let new_head = unsafe { list.insert_before(Some(first), 1u32) }.unwrap();

        assert_eq!(list.head(), Some(new_head));
        assert!(unsafe { new_head.as_ref() }.is_first());
        itertools::assert_equal(list.iter(), &[1, 2]);
        assert_symmetric(&list);
    }

    #[test]
    fn insert_between_nodes() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 1u32) }.unwrap();
        let third = unsafe { list.insert_after(Some(first), 3u32) }.unwrap();
        unsafe { list.insert_before(Some(third), 2u32) }.unwrap();

        itertools::assert_equal(list.iter(), &[1, 2, 3]);
        assert_symmetric(&list);
    }

    #[test]
    fn remove_middle_node() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 1u32) }.unwrap();
        let second = unsafe { list.insert_after(Some(first), 2u32) }.unwrap();
        let third = unsafe { list.insert_after(Some(second), 3u32) }.unwrap();

        assert_eq!(unsafe { list.remove(second) }, Ok(2));
        assert_eq!(list.len(), 2);
        itertools::assert_equal(list.iter(), &[1, 3]);
        assert_eq!(unsafe { third.as_ref() }.prev(), list.head());
        assert_symmetric(&list);
    }

    #[test]
    fn remove_head_clears_successor_prev() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 1u32) }.unwrap();
        let second = unsafe { list.insert_after(Some(first), 2u32) }.unwrap();

        assert_eq!(unsafe { list.remove(first) }, Ok(1));
        assert_eq!(list.head(), Some(second));
        assert!(unsafe { second.as_ref() }.is_first());
        assert_symmetric(&list);
    }

    #[test]
    fn remove_tail_moves_tail_back() {
        let mut list = DefaultDoublyList::new();
        let first = unsafe { list.insert_after(None, 1u32) }.unwrap();
        let second = unsafe { list.insert_after(Some(first), 2u32) }.unwrap();

        assert_eq!(unsafe { list.remove(second) }, Ok(2));
        assert_eq!(list.tail(), Some(first));
        assert!(unsafe { first.as_ref() }.is_last());
        assert_symmetric(&list);
    }

    #[test]
    fn remove_last_element_empties_list() {
        let mut list = DefaultDoublyList::new();
        let node = unsafe { list.insert_after(None, 1u32) }.unwrap();

        assert_eq!(unsafe { list.remove(node) }, Ok(1));
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);

        // the empty-list guard fires before the node is ever touched
        assert_eq!(unsafe { list.remove(node) }, Err(ListError::EmptyList));
    }

    #[test]
    fn double_ended_iteration() {
        let mut list = DefaultDoublyList::new();
        list.extend([1u32, 2, 3, 4]);

        itertools::assert_equal(list.iter().rev(), &[4, 3, 2, 1]);

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn disposer_runs_tail_to_head() {
        let disposed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&disposed);

        let mut list = DefaultDoublyList::with_disposer(move |value: u32| {
            sink.borrow_mut().push(value);
        });
        list.extend([1, 2, 3]);
        list.clear();

        assert_eq!(*disposed.borrow(), vec![3, 2, 1]);
        assert!(list.is_empty());
        assert_symmetric(&list);
    }

    #[test]
    fn pool_exhaustion_leaves_list_intact() {
        let pool = FixedPool::<Node<u32>>::with_capacity(1);
        let mut list = DoublyList::new_in(pool);

        let node = unsafe { list.insert_after(None, 1) }.unwrap();
        assert_eq!(
            unsafe { list.insert_after(Some(node), 2) },
            Err(ListError::AllocationFailure)
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.tail(), Some(node));
    }

    #[test]
    fn iter_mut_modifies_in_place() {
        let mut list = DefaultDoublyList::new();
        list.extend([1u32, 2, 3]);

        for value in list.iter_mut().rev() {
            *value *= 2;
        }
        itertools::assert_equal(&list, &[2, 4, 6]);
    }
}
