use alloc::boxed::Box;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

type Link<T> = Option<NonNull<Node<T>>>;

struct Node<T> {
    value: T,
    next: Link<T>,
}

/// A list where every node links only to its successor.
///
/// The list keeps both ends so [`push_back`](SinglyLinkedList::push_back) is
/// `O(1)`. Searching and removing by value walk from the head.
///
/// # Examples
///
/// ```rust
/// use chained_hash::SinglyLinkedList;
///
/// let mut list: SinglyLinkedList<_> = ["Dennis", "Bjarne", "Stepanov"].into_iter().collect();
///
/// assert!(list.remove(&"Bjarne"));
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), ["Dennis", "Stepanov"]);
///
/// assert_eq!(list.clear(), 2);
/// assert!(list.is_empty());
/// ```
pub struct SinglyLinkedList<T> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    _phantom: PhantomData<Box<Node<T>>>,
}

// SAFETY: The list owns its nodes exclusively, exactly like a `Box<T>` per
// element, so it is as thread-safe as `T` is.
unsafe impl<T: Send> Send for SinglyLinkedList<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for SinglyLinkedList<T> {}

impl<T> SinglyLinkedList<T> {
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
        let node = NonNull::from(Box::leak(Box::new(Node { value, next: None })));

        match self.tail {
            // SAFETY: `tail` is a live node owned by this list and nothing else
            // holds a reference to it while we have `&mut self`.
            Some(tail) => unsafe { (*tail.as_ptr()).next = Some(node) },
            None => self.head = Some(node),
        }

        self.tail = Some(node);
        self.len += 1;
    }

    /// Prepends an element before the current head.
    pub fn push_front(&mut self, value: T) {
        let node = NonNull::from(Box::leak(Box::new(Node {
            value,
            next: self.head,
        })));

        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
    }

    /// Removes the first element and returns it.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head.map(|head| {
            // SAFETY: `head` was allocated by `Box` in a push method and is
            // unlinked below before anything can observe it again.
            let node = unsafe { Box::from_raw(head.as_ptr()) };
            self.head = node.next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;
            node.value
        })
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
    ///
    /// The scan keeps a non-owning handle to the previous node so it can be
    /// relinked past the removed one.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let mut previous: Link<T> = None;
        let mut cursor = self.head;

        while let Some(current) = cursor {
            // SAFETY: Every link reachable from `head` is a live node owned by
            // this list.
            let (matches, next) = unsafe {
                let node = &*current.as_ptr();
                (node.value == *value, node.next)
            };

            if matches {
                match previous {
                    // SAFETY: `previous` precedes `current` in this list and is
                    // still live.
                    Some(previous) => unsafe { (*previous.as_ptr()).next = next },
                    None => self.head = next,
                }
                if self.tail == Some(current) {
                    self.tail = previous;
                }
                self.len -= 1;

                // SAFETY: `current` came from `Box::leak` and is no longer
                // reachable from the list.
                drop(unsafe { Box::from_raw(current.as_ptr()) });
                return true;
            }

            previous = Some(current);
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

    /// Returns an iterator over the elements from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head,
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for SinglyLinkedList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for SinglyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for SinglyLinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for SinglyLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for SinglyLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SinglyLinkedList<T> {}

impl<T> Extend<T> for SinglyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for SinglyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a SinglyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for SinglyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// A borrowing iterator over a [`SinglyLinkedList`].
pub struct Iter<'a, T> {
    next: Link<T>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|current| {
            // SAFETY: The list is borrowed for `'a`, so every node reachable
            // from it stays live and unmodified for that long.
            let node = unsafe { &*current.as_ptr() };
            self.next = node.next;
            self.remaining -= 1;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            next: self.next,
            remaining: self.remaining,
            _marker: PhantomData,
        }
    }
}

/// An owning iterator over a [`SinglyLinkedList`].
pub struct IntoIter<T> {
    list: SinglyLinkedList<T>,
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

impl<T> ExactSizeIterator for IntoIter<T> {}
