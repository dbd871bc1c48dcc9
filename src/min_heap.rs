use thiserror::Error;

/// Binary min-heap ordered by `(weight, seq)`.
///
/// `seq` is assigned on insertion from a counter that only grows, so items
/// of equal weight come out in the order they went in.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<Slot<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    weight: u64,
    seq: u64,
    item: T,
}

impl<T> Slot<T> {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.seq)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeapErr {
    #[error("extract from empty heap")]
    HeapUnderflow,
}

impl<T> MinHeap<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn heap_size(&self) -> usize {
        self.elements.len()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.elements[a].key() < self.elements[b].key()
    }

    pub fn insert(&mut self, weight: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.push(Slot { weight, seq, item });

        let mut i = self.heap_size() - 1;
        while i > 0 && self.less(i, Self::parent(i)) {
            self.elements.swap(i, Self::parent(i));
            i = Self::parent(i);
        }
        debug_assert!(self.valid_min_heap());
    }

    /// Removes the lightest item, earliest inserted first among equals.
    pub fn extract_min(&mut self) -> Result<(u64, T), HeapErr> {
        if self.elements.is_empty() {
            return Err(HeapErr::HeapUnderflow);
        }
        let last = self.heap_size() - 1;
        self.elements.swap(0, last);
        let slot = self.elements.pop().ok_or(HeapErr::HeapUnderflow)?;
        self.min_heapify(0);
        Ok((slot.weight, slot.item))
    }

    fn min_heapify(&mut self, mut i: usize) {
        let n = self.heap_size();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;
            if l < n && self.less(l, smallest) {
                smallest = l;
            }
            if r < n && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    fn valid_min_heap(&self) -> bool {
        (1..self.heap_size()).all(|i| !self.less(i, Self::parent(i)))
    }
}
