//! Generic linked-list container ADTs: [`SinglyList`], [`CircularList`],
//! and [`DoublyList`], plus [`Stack`] and [`Queue`] adapters over the
//! singly linked list. Nodes are allocated through the [`Allocator`]
//! trait; [`FixedPool`] bounds allocation and makes exhaustion observable
//! as [`ListError::AllocationFailure`].

pub mod allocator;
pub mod circular_list;
pub mod dispose;
pub mod doubly_list;
pub mod error;
pub mod fixed_pool;
pub mod queue;
pub mod singly_list;
pub mod stack;

pub use allocator::{Allocator, DefaultAllocator};
pub use circular_list::{CircularList, DefaultCircularList};
pub use dispose::Disposer;
pub use doubly_list::{DefaultDoublyList, DoublyList};
pub use error::{ListError, Result};
pub use fixed_pool::FixedPool;
pub use queue::{DefaultQueue, Queue};
pub use singly_list::{DefaultSinglyList, SinglyList};
pub use stack::{DefaultStack, Stack};
