use alloc::boxed::Box;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    prev: Link<T>,
    value: T,
    next: Link<T>,
}

/// A list with links in both directions.
///
/// Both ends are tracked, so pushing and popping at either end is `O(1)`, and
/// [`iter`](DoublyLinkedList::iter) can be walked from either end.
///
/// | Method | Complexity |
/// |-|-|
/// | `len` | `O(1)` |
/// | `front/back` | `O(1)` |
/// | `push_front/back` | `O(1)` |
/// | `pop_front/back` | `O(1)` |
/// | `remove` | `O(n)` |
/// | `contains` | `O(n)` |
///
/// # Examples
///
/// ```rust
/// use chained_hash::DoublyLinkedList;
///
/// let mut list = DoublyLinkedList::new();
/// list.push_back(1);
/// list.push_back(2);
/// list.push_back(3);
///
/// assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// assert!(list.remove(&2));
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [1, 3]);
/// ```
pub struct DoublyLinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _phantom: PhantomData<Box<Node<T>>>,
}

// SAFETY: Nodes are owned exclusively by the list.
unsafe impl<T: Send> Send for DoublyLinkedList<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for DoublyLinkedList<T> {}

impl<T> DoublyLinkedList<T> {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the list.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the first element.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: `head` always points at a live node owned by this list.
        self.head.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Returns a reference to the last element.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: `tail` always points at a live node owned by this list.
        self.tail.map(|node| unsafe { &(*node.as_ptr()).value })
    }

    /// Appends an element after the current tail.
    pub fn push_back(&mut self, value: T) {
        let node = NonNull::from(Box::leak(Box::new(Node {
            prev: self.tail,
            value,
            next: None,
        })));

        match self.tail {
            // SAFETY: `tail` is live and owned by this list.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }

        self.tail = Some(node);
        self.len += 1;
    }

    /// Prepends an element before the current head.
    pub fn push_front(&mut self, value: T) {
        let node = NonNull::from(Box::leak(Box::new(Node {
            prev: None,
            value,
            next: self.head,
        })));

        match self.head {
            // SAFETY: `head` is live and owned by this list.
            Some(head) => unsafe { (*head.as_ptr()).prev = Some(node) },
            None => self.tail = Some(node),
        }

        self.head = Some(node);
        self.len += 1;
    }

    /// Removes the first element and returns it.
    pub fn pop_front(&mut self) -> Option<T> {
        // SAFETY: `head` is a live node of this list.
        self.head.map(|head| unsafe { self.unlink(head) })
    }

    /// Removes the last element and returns it.
    pub fn pop_back(&mut self) -> Option<T> {
        // SAFETY: `tail` is a live node of this list.
        self.tail.map(|tail| unsafe { self.unlink(tail) })
    }

    /// Detaches `node` from its neighbours and takes its value.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list. It is freed by this call.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        // SAFETY: Caller guarantees `node` is a live, `Box`-allocated node of
        // this list; its neighbours are live too.
        unsafe {
            let node = Box::from_raw(node.as_ptr());

            match node.prev {
                Some(prev) => (*prev.as_ptr()).next = node.next,
                None => self.head = node.next,
            }
            match node.next {
                Some(next) => (*next.as_ptr()).prev = node.prev,
                None => self.tail = node.prev,
            }

            self.len -= 1;
            node.value
        }
    }

    /// Returns `true` if the list contains an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Removes the first element equal to `value`, returning whether one was
    /// found.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let mut cursor = self.head;

        while let Some(current) = cursor {
            // SAFETY: Every link reachable from `head` is a live node owned by
            // this list.
            let (matches, next) = unsafe {
                let node = &*current.as_ptr();
                (node.value == *value, node.next)
            };

            if matches {
                // SAFETY: `current` was just reached from `head`.
                drop(unsafe { self.unlink(current) });
                return true;
            }

            cursor = next;
        }

        false
    }

    /// Drops every element, returning how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.len;

        let mut cursor = self.head.take();
        self.tail = None;
        self.len = 0;

        while let Some(current) = cursor {
            // SAFETY: Nodes are released front to back, each exactly once, and
            // the list no longer links to any of them.
            let node = unsafe { Box::from_raw(current.as_ptr()) };
            cursor = node.next;
        }

        released
    }

    /// Returns a double-ended iterator over the elements.
    ///
    /// Walking it with [`rev`](Iterator::rev) visits the list from tail to
    /// head.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head,
            tail: self.tail,
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for DoublyLinkedList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for DoublyLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for DoublyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DoublyLinkedList<T> {}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// A borrowing, double-ended iterator over a [`DoublyLinkedList`].
pub struct Iter<'a, T> {
    head: Link<T>,
    tail: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.head.map(|current| {
            // SAFETY: The list is borrowed for `'a`; its nodes stay live.
            let node = unsafe { &*current.as_ptr() };
            self.head = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.tail.map(|current| {
            // SAFETY: The list is borrowed for `'a`; its nodes stay live.
            let node = unsafe { &*current.as_ptr() };
            self.tail = node.prev;
            self.remaining -= 1;
            &node.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning, double-ended iterator over a [`DoublyLinkedList`].
pub struct IntoIter<T> {
    list: DoublyLinkedList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
