// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::{cmp::Ordering, collections::BinaryHeap};

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: f64,
    seq: u64,
    vertex: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // larger key first, then earlier push
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Max-queue of candidate vertices keyed by `|in_circle|`.
#[derive(Debug, Clone, Default)]
pub struct VertexQueue {
    heap: BinaryHeap<Entry>,
    seq: u64,
}

impl VertexQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, vertex: usize, det: f64) {
        self.heap.push(Entry {
            key: det.abs(),
            seq: self.seq,
            vertex,
        });
        self.seq += 1;
    }

    pub fn pop(&mut self) -> Option<(usize, f64)> {
        self.heap.pop().map(|e| (e.vertex, e.key))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.seq = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_by_magnitude_then_push_order() {
        let mut q = VertexQueue::new();
        q.push(1, 0.5);
        q.push(2, -2.0);
        q.push(3, 0.5);
        q.push(4, 1.0);
        let order: Vec<usize> = std::iter::from_fn(|| q.pop().map(|(v, _)| v)).collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
        assert!(q.is_empty());
    }
}
