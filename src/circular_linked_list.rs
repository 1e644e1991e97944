use alloc::boxed::Box;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

struct Node<T> {
    value: T,
    next: NonNull<Node<T>>,
}

/// A singly linked ring addressed through its last node.
///
/// Only the tail is stored. The tail's successor is the head, which makes
/// appending, prepending and popping the front all `O(1)` with a single link.
///
/// # Examples
///
/// ```rust
/// use chained_hash::CircularLinkedList;
///
/// let mut ring: CircularLinkedList<_> = (1..=4).collect();
/// ring.rotate();
/// assert_eq!(ring.iter().copied().collect::<Vec<_>>(), [2, 3, 4, 1]);
/// assert!(ring.remove(&4));
/// assert_eq!(ring.back(), Some(&1));
/// ```
pub struct CircularLinkedList<T> {
    tail: Option<NonNull<Node<T>>>,
    len: usize,
    _phantom: PhantomData<Box<Node<T>>>,
}

// SAFETY: Nodes are owned exclusively by the list.
unsafe impl<T: Send> Send for CircularLinkedList<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for CircularLinkedList<T> {}

impl<T> CircularLinkedList<T> {
    /// Creates an empty ring.
    pub const fn new() -> Self {
        Self {
            tail: None,
            len: 0,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of elements in the ring.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the ring holds no elements.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn head(&self) -> Option<NonNull<Node<T>>> {
        // SAFETY: `tail` is a live node owned by this ring.
        self.tail.map(|tail| unsafe { (*tail.as_ptr()).next })
    }

    /// Returns a reference to the first element.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: The head is a live node owned by this ring.
        self.head().map(|head| unsafe { &(*head.as_ptr()).value })
    }

    /// Returns a reference to the last element.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: `tail` is a live node owned by this ring.
        self.tail.map(|tail| unsafe { &(*tail.as_ptr()).value })
    }

    /// Splices a new node in after the tail and returns it.
    fn link_after_tail(&mut self, value: T) -> NonNull<Node<T>> {
        let node = NonNull::from(Box::leak(Box::new(Node {
            value,
            next: NonNull::dangling(),
        })));

        // SAFETY: `node` was just allocated; `tail` is live and owned by this
        // ring.
        unsafe {
            match self.tail {
                Some(tail) => {
                    (*node.as_ptr()).next = (*tail.as_ptr()).next;
                    (*tail.as_ptr()).next = node;
                }
                None => {
                    (*node.as_ptr()).next = node;
                    self.tail = Some(node);
                }
            }
        }

        self.len += 1;
        node
    }

    /// Appends an element, making it the new tail.
    pub fn push_back(&mut self, value: T) {
        let node = self.link_after_tail(value);
        self.tail = Some(node);
    }

    /// Prepends an element, making it the new head.
    pub fn push_front(&mut self, value: T) {
        self.link_after_tail(value);
    }

    /// Removes the first element and returns it.
    pub fn pop_front(&mut self) -> Option<T> {
        let tail = self.tail?;
        // SAFETY: `tail` is live, so is its successor.
        Some(unsafe { self.unlink_after(tail) })
    }

    /// Detaches the successor of `previous` and takes its value.
    ///
    /// # Safety
    ///
    /// `previous` must be a live node of this ring. Its successor is freed by
    /// this call.
    unsafe fn unlink_after(&mut self, previous: NonNull<Node<T>>) -> T {
        // SAFETY: Caller guarantees `previous` is live; every node in the ring
        // was leaked from a `Box` by `link_after_tail`.
        unsafe {
            let current = (*previous.as_ptr()).next;

            if current == previous {
                self.tail = None;
            } else {
                (*previous.as_ptr()).next = (*current.as_ptr()).next;
                if Some(current) == self.tail {
                    self.tail = Some(previous);
                }
            }

            self.len -= 1;
            let node = Box::from_raw(current.as_ptr());
            node.value
        }
    }

    /// Moves the head to the back of the ring.
    pub fn rotate(&mut self) {
        self.tail = self.head();
    }

    /// Returns `true` if the ring contains an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Removes the first element equal to `value`, returning whether one was
    /// found.
    ///
    /// The walk starts at the head and stops after one lap.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let Some(mut previous) = self.tail else {
            return false;
        };

        for _ in 0..self.len {
            // SAFETY: `previous` is a live node and so is its successor.
            let current = unsafe { (*previous.as_ptr()).next };
            // SAFETY: As above.
            if unsafe { (*current.as_ptr()).value == *value } {
                // SAFETY: `previous` is a live node of this ring.
                drop(unsafe { self.unlink_after(previous) });
                return true;
            }
            previous = current;
        }

        false
    }

    /// Drops every element, returning how many were released.
    pub fn clear(&mut self) -> usize {
        let released = self.len;
        let mut cursor = self.head();

        self.tail = None;
        self.len = 0;

        for _ in 0..released {
            let Some(current) = cursor else {
                break;
            };
            // SAFETY: Exactly `released` distinct nodes form the lap starting
            // at the head; each is freed once and the ring no longer links to
            // any of them.
            let node = unsafe { Box::from_raw(current.as_ptr()) };
            cursor = Some(node.next);
        }

        released
    }

    /// Returns an iterator over one lap of the ring, head first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for CircularLinkedList<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Default for CircularLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for CircularLinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for CircularLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for CircularLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for CircularLinkedList<T> {}

impl<T> Extend<T> for CircularLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for CircularLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a CircularLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for CircularLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// A borrowing iterator over one lap of a [`CircularLinkedList`].
pub struct Iter<'a, T> {
    next: Option<NonNull<Node<T>>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.next.map(|current| {
            // SAFETY: The ring is borrowed for `'a`; its nodes stay live.
            let node = unsafe { &*current.as_ptr() };
            self.next = Some(node.next);
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

/// An owning iterator over a [`CircularLinkedList`], head first.
pub struct IntoIter<T> {
    list: CircularLinkedList<T>,
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

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use super::*;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn lap(list: &CircularLinkedList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    #[test]
    fn single_node_links_to_itself() {
        let mut ring = CircularLinkedList::new();
        ring.push_back(7);

        let tail = ring.tail.unwrap();
        assert_eq!(ring.head(), Some(tail));
        assert_eq!(ring.front(), Some(&7));
        assert_eq!(ring.back(), Some(&7));
    }

    #[test]
    fn push_both_ends() {
        let mut ring = CircularLinkedList::new();
        ring.push_back(2);
        ring.push_front(1);
        ring.push_back(3);
        ring.push_front(0);

        assert_eq!(lap(&ring), vec![0, 1, 2, 3]);
        assert_eq!(ring.front(), Some(&0));
        assert_eq!(ring.back(), Some(&3));
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn iteration_stops_after_one_lap() {
        let ring: CircularLinkedList<i32> = (0..3).collect();
        assert_eq!(ring.iter().count(), 3);
        assert_eq!(ring.iter().len(), 3);
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut ring: CircularLinkedList<i32> = (1..=5).collect();

        assert!(ring.remove(&1));
        assert_eq!(ring.front(), Some(&2));

        assert!(ring.remove(&3));
        assert_eq!(lap(&ring), vec![2, 4, 5]);

        assert!(ring.remove(&5));
        assert_eq!(ring.back(), Some(&4));
        ring.push_back(6);
        assert_eq!(lap(&ring), vec![2, 4, 6]);

        assert!(!ring.remove(&5));
        assert!(ring.remove(&2));
        assert!(ring.remove(&6));
        assert!(ring.remove(&4));
        assert!(ring.is_empty());
        assert_eq!(ring.front(), None);
        assert!(!ring.remove(&4));
    }

    #[test]
    fn remove_takes_first_duplicate() {
        let mut ring: CircularLinkedList<i32> = [3, 1, 3].into_iter().collect();
        assert!(ring.remove(&3));
        assert_eq!(lap(&ring), vec![1, 3]);
        assert_eq!(ring.back(), Some(&3));
    }

    #[test]
    fn rotate_moves_head_to_back() {
        let mut ring: CircularLinkedList<i32> = (1..=3).collect();
        ring.rotate();
        assert_eq!(lap(&ring), vec![2, 3, 1]);
        ring.rotate();
        ring.rotate();
        assert_eq!(lap(&ring), vec![1, 2, 3]);

        let mut empty: CircularLinkedList<i32> = CircularLinkedList::new();
        empty.rotate();
        assert!(empty.is_empty());
    }

    #[test]
    fn pop_front_drains_ring() {
        let mut ring: CircularLinkedList<i32> = (0..3).collect();
        assert_eq!(ring.pop_front(), Some(0));
        assert_eq!(ring.pop_front(), Some(1));
        assert_eq!(ring.back(), Some(&2));
        assert_eq!(ring.pop_front(), Some(2));
        assert_eq!(ring.pop_front(), None);
        assert_eq!(ring.back(), None);
    }

    #[test]
    fn clear_counts_and_drops() {
        let drops = Rc::new(Cell::new(0));
        let mut ring = CircularLinkedList::new();
        for _ in 0..5 {
            ring.push_back(DropCounter(drops.clone()));
        }

        assert_eq!(ring.clear(), 5);
        assert_eq!(drops.get(), 5);
        assert_eq!(ring.clear(), 0);

        ring.push_front(DropCounter(drops.clone()));
        drop(ring);
        assert_eq!(drops.get(), 6);
    }

    #[test]
    fn clone_and_into_iter() {
        let ring: CircularLinkedList<i32> = (0..4).collect();
        let copy = ring.clone();
        assert_eq!(copy, ring);
        assert_eq!(alloc::format!("{:?}", copy), "[0, 1, 2, 3]");
        assert_eq!(ring.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn long_ring_drops_iteratively() {
        let ring: CircularLinkedList<u64> = (0..500_000).collect();
        assert_eq!(ring.len(), 500_000);
        drop(ring);
    }
}
