use alloc::boxed::Box;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::NonNull;

struct Node<T> {
    prev: NonNull<Node<T>>,
    next: NonNull<Node<T>>,
    /// Uninitialized only in the sentinel.
    value: MaybeUninit<T>,
}

/// A doubly linked ring built around a single dummy node.
///
/// The sentinel sits between the last and first element and links to itself
/// when the list is empty. Every real node therefore always has a live
/// predecessor and successor, so linking and unlinking never branch on
/// whether the node sits at an end of the list.
///
/// # Examples
///
/// ```rust
/// use chained_hash::SentinelLinkedList;
///
/// let mut list: SentinelLinkedList<_> = ["a", "b", "c"].into_iter().collect();
/// assert!(list.remove(&"a"));
/// assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), ["c", "b"]);
/// assert_eq!(list.clear(), 2);
/// ```
pub struct SentinelLinkedList<T> {
    sentinel: NonNull<Node<T>>,
    len: usize,
    _phantom: PhantomData<Box<Node<T>>>,
}

// SAFETY: Nodes, sentinel included, are owned exclusively by the list.
unsafe impl<T: Send> Send for SentinelLinkedList<T> {}
// SAFETY: Shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for SentinelLinkedList<T> {}

impl<T> SentinelLinkedList<T> {
    /// Creates an empty list, allocating its sentinel.
    pub fn new() -> Self {
        let sentinel = NonNull::from(Box::leak(Box::new(Node {
            prev: NonNull::dangling(),
            next: NonNull::dangling(),
            value: MaybeUninit::uninit(),
        })));

        // SAFETY: `sentinel` was just allocated and nothing else refers to it.
        unsafe {
            (*sentinel.as_ptr()).prev = sentinel;
            (*sentinel.as_ptr()).next = sentinel;
        }

        Self {
            sentinel,
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

    fn first(&self) -> NonNull<Node<T>> {
        // SAFETY: The sentinel lives as long as the list.
        unsafe { (*self.sentinel.as_ptr()).next }
    }

    fn last(&self) -> NonNull<Node<T>> {
        // SAFETY: The sentinel lives as long as the list.
        unsafe { (*self.sentinel.as_ptr()).prev }
    }

    /// Returns a reference to the first element.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: A non-empty list's first node is a real, initialized node.
        Some(unsafe { (*self.first().as_ptr()).value.assume_init_ref() })
    }

    /// Returns a reference to the last element.
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: A non-empty list's last node is a real, initialized node.
        Some(unsafe { (*self.last().as_ptr()).value.assume_init_ref() })
    }

    /// Inserts `value` immediately before `at`.
    ///
    /// # Safety
    ///
    /// `at` must be the sentinel or a live node of this list.
    unsafe fn link_before(&mut self, at: NonNull<Node<T>>, value: T) {
        // SAFETY: Caller guarantees `at` is part of this ring, so its
        // predecessor is too.
        unsafe {
            let prev = (*at.as_ptr()).prev;
            let node = NonNull::from(Box::leak(Box::new(Node {
                prev,
                next: at,
                value: MaybeUninit::new(value),
            })));
            (*prev.as_ptr()).next = node;
            (*at.as_ptr()).prev = node;
        }
        self.len += 1;
    }

    /// Detaches `node` from the ring and takes its value.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this list other than the sentinel. It is
    /// freed by this call.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        // SAFETY: Caller guarantees `node` is a real, `Box`-allocated node of
        // this ring, so its value is initialized and its neighbours are live.
        unsafe {
            let node = Box::from_raw(node.as_ptr());
            (*node.prev.as_ptr()).next = node.next;
            (*node.next.as_ptr()).prev = node.prev;
            self.len -= 1;
            node.value.assume_init()
        }
    }

    /// Appends an element before the sentinel.
    pub fn push_back(&mut self, value: T) {
        // SAFETY: The sentinel is always part of the ring.
        unsafe { self.link_before(self.sentinel, value) }
    }

    /// Prepends an element after the sentinel.
    pub fn push_front(&mut self, value: T) {
        let first = self.first();
        // SAFETY: The sentinel's successor is the sentinel or a live node.
        unsafe { self.link_before(first, value) }
    }

    /// Removes the first element and returns it.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let first = self.first();
        // SAFETY: The list is non-empty, so `first` is not the sentinel.
        Some(unsafe { self.unlink(first) })
    }

    /// Removes the last element and returns it.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let last = self.last();
        // SAFETY: The list is non-empty, so `last` is not the sentinel.
        Some(unsafe { self.unlink(last) })
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
        let mut cursor = self.first();

        while cursor != self.sentinel {
            // SAFETY: Every node between the sentinel's successor and the
            // sentinel is a real, initialized node.
            let (matches, next) = unsafe {
                let node = &*cursor.as_ptr();
                (node.value.assume_init_ref() == value, node.next)
            };

            if matches {
                // SAFETY: `cursor` is a real node of this list.
                drop(unsafe { self.unlink(cursor) });
                return true;
            }

            cursor = next;
        }

        false
    }

    /// Drops every element, returning how many were released.
    ///
    /// The sentinel is kept, so the list stays usable.
    pub fn clear(&mut self) -> usize {
        let released = self.len;
        let mut cursor = self.first();

        // SAFETY: The sentinel lives as long as the list; resetting its links
        // first detaches every real node.
        unsafe {
            (*self.sentinel.as_ptr()).prev = self.sentinel;
            (*self.sentinel.as_ptr()).next = self.sentinel;
        }
        self.len = 0;

        while cursor != self.sentinel {
            // SAFETY: Each detached real node is freed exactly once, and its
            // value is initialized.
            unsafe {
                let mut node = Box::from_raw(cursor.as_ptr());
                cursor = node.next;
                node.value.assume_init_drop();
            }
        }

        released
    }

    /// Returns a double-ended iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.first(),
            tail: self.last(),
            remaining: self.len,
            _marker: PhantomData,
        }
    }
}

impl<T> Drop for SentinelLinkedList<T> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: The sentinel was leaked from a `Box` in `new` and is freed
        // only here. Its value is uninitialized and is not dropped.
        drop(unsafe { Box::from_raw(self.sentinel.as_ptr()) });
    }
}

impl<T> Default for SentinelLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for SentinelLinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone> Clone for SentinelLinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for SentinelLinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SentinelLinkedList<T> {}

impl<T> Extend<T> for SentinelLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for SentinelLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a SentinelLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for SentinelLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

/// A borrowing, double-ended iterator over a [`SentinelLinkedList`].
pub struct Iter<'a, T> {
    head: NonNull<Node<T>>,
    tail: NonNull<Node<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // SAFETY: While `remaining > 0`, `head` is a real node of a list
        // borrowed for `'a`.
        let node = unsafe { &*self.head.as_ptr() };
        self.head = node.next;
        self.remaining -= 1;
        // SAFETY: Real nodes hold initialized values.
        Some(unsafe { node.value.assume_init_ref() })
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

        // SAFETY: While `remaining > 0`, `tail` is a real node of a list
        // borrowed for `'a`.
        let node = unsafe { &*self.tail.as_ptr() };
        self.tail = node.prev;
        self.remaining -= 1;
        // SAFETY: Real nodes hold initialized values.
        Some(unsafe { node.value.assume_init_ref() })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning, double-ended iterator over a [`SentinelLinkedList`].
pub struct IntoIter<T> {
    list: SentinelLinkedList<T>,
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

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
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

    fn forward(list: &SentinelLinkedList<i32>) -> Vec<i32> {
        list.iter().copied().collect()
    }

    fn backward(list: &SentinelLinkedList<i32>) -> Vec<i32> {
        list.iter().rev().copied().collect()
    }

    #[test]
    fn empty_ring_links_to_itself() {
        let list: SentinelLinkedList<i32> = SentinelLinkedList::new();
        assert_eq!(list.first(), list.sentinel);
        assert_eq!(list.last(), list.sentinel);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.iter().next(), None);
    }

    #[test]
    fn push_and_walk_both_ways() {
        let mut list = SentinelLinkedList::new();
        list.push_back(2);
        list.push_back(3);
        list.push_front(1);

        assert_eq!(forward(&list), vec![1, 2, 3]);
        assert_eq!(backward(&list), vec![3, 2, 1]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_every_position() {
        let mut list: SentinelLinkedList<i32> = (1..=5).collect();

        assert!(list.remove(&1));
        assert!(list.remove(&5));
        assert!(list.remove(&3));
        assert_eq!(forward(&list), vec![2, 4]);
        assert_eq!(backward(&list), vec![4, 2]);

        assert!(!list.remove(&3));
        assert!(list.remove(&2));
        assert!(list.remove(&4));
        assert!(list.is_empty());
        assert_eq!(list.first(), list.sentinel);

        list.push_back(9);
        assert_eq!(forward(&list), vec![9]);
    }

    #[test]
    fn remove_takes_first_duplicate() {
        let mut list: SentinelLinkedList<i32> = [1, 2, 1, 3].into_iter().collect();

        assert!(list.remove(&1));
        assert_eq!(forward(&list), vec![2, 1, 3]);
        assert!(list.remove(&1));
        assert_eq!(backward(&list), vec![3, 2]);
        assert!(!list.remove(&1));
    }

    #[test]
    fn pop_both_ends() {
        let mut list: SentinelLinkedList<i32> = (0..3).collect();
        assert_eq!(list.pop_back(), Some(2));
        assert_eq!(list.pop_front(), Some(0));
        assert_eq!(list.pop_front(), Some(1));
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);
    }

    #[test]
    fn clear_counts_and_drops() {
        let drops = Rc::new(Cell::new(0));
        let mut list = SentinelLinkedList::new();
        for _ in 0..6 {
            list.push_back(DropCounter(drops.clone()));
        }

        assert_eq!(list.clear(), 6);
        assert_eq!(drops.get(), 6);
        assert_eq!(list.clear(), 0);

        list.push_back(DropCounter(drops.clone()));
        list.push_front(DropCounter(drops.clone()));
        drop(list);
        assert_eq!(drops.get(), 8);
    }

    #[test]
    fn owned_strings() {
        let mut list: SentinelLinkedList<String> =
            ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        assert!(list.contains(&"y".to_string()));
        assert!(list.remove(&"y".to_string()));
        assert!(!list.contains(&"y".to_string()));
        assert_eq!(alloc::format!("{:?}", list), r#"["x", "z"]"#);

        let copy = list.clone();
        assert_eq!(copy, list);
        assert_eq!(
            list.into_iter().rev().collect::<Vec<_>>(),
            vec!["z".to_string(), "x".to_string()]
        );
    }

    #[test]
    fn long_list_drops_iteratively() {
        let list: SentinelLinkedList<u64> = (0..500_000).collect();
        assert_eq!(list.len(), 500_000);
        drop(list);
    }
}
