use std::fmt::{Debug, Formatter};

use duplicate::duplicate_item;

use crate::allocator::{Allocator, DefaultAllocator};
use crate::error::Result;
use crate::singly_list::{Iter, SinglyList};

/// Queue with the default allocator.
pub type DefaultQueue<T> = Queue<T, DefaultAllocator>;

/// A first-in, first-out adapter over [`SinglyList`].
///
/// Values enter after the list's tail and leave at its head, and no node
/// handles escape, so the whole surface is safe.
pub struct Queue<T, A: Allocator = DefaultAllocator> {
    list: SinglyList<T, A>,
}

impl<T, A: Allocator + Default> Queue<T, A> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self {
            list: SinglyList::new(),
        }
    }

    /// Create a new, empty queue whose remaining elements are passed to
    /// `disposer` when the queue is cleared or dropped.
    pub fn with_disposer(disposer: impl FnMut(T) + 'static) -> Self {
        Self {
            list: SinglyList::with_disposer(disposer),
        }
    }
}

impl<T, A: Allocator> Queue<T, A> {
    /// Create a new, empty queue inside `allocator`.
    pub fn new_in(allocator: A) -> Self {
        Self {
            list: SinglyList::new_in(allocator),
        }
    }

    /// Create a new, empty queue inside `allocator`, with a teardown
    /// disposer.
    pub fn with_disposer_in(disposer: impl FnMut(T) + 'static, allocator: A) -> Self {
        Self {
            list: SinglyList::with_disposer_in(disposer, allocator),
        }
    }

    /// The number of elements in the queue
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// If the queue is empty or not
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Append a value at the back of the queue.
    ///
    /// # Errors
    /// [`ListError::AllocationFailure`](crate::error::ListError) if node
    /// allocation fails; the queue is left unmodified.
    pub fn enqueue(&mut self, value: T) -> Result<()> {
        let tail = self.list.tail();
        // the anchor is this queue's own tail
        unsafe { self.list.insert_after(tail, value) }.map(|_| ())
    }

    /// Take the value at the front of the queue.
    ///
    /// # Errors
    /// [`ListError::EmptyList`](crate::error::ListError) if the queue is
    /// empty.
    pub fn dequeue(&mut self) -> Result<T> {
        unsafe { self.list.remove_after(None) }
    }

    /// Read the value at the front of the queue without removing it;
    /// `None` when the queue is empty.
    #[duplicate_item(
        peek        Self        Ref        front;
        [peek]      [&Self]     [&T]       [front];
        [peek_mut]  [&mut Self] [&mut T]   [front_mut];
    )]
    #[allow(clippy::needless_arbitrary_self_type)]
    pub fn peek(self: Self) -> Option<Ref> {
        self.list.front()
    }

    /// Remove all elements, passing each to the disposer if one was
    /// registered.
    pub fn clear(&mut self) {
        self.list.clear()
    }

    /// Iterate the queue's values from front to back
    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }
}

impl<T: Debug, A: Allocator> Debug for Queue<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.list.fmt(f)
    }
}

impl<T, A: Allocator + Default> Default for Queue<T, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Enqueues each item in iteration order.
///
/// # Panics
/// Panics if node allocation fails; the fallible path is `enqueue`.
impl<T, A: Allocator> Extend<T> for Queue<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item).expect("node allocation failed");
        }
    }
}

impl<T, A: Allocator + Default> FromIterator<T> for Queue<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}
