//! Linearizing processors under ordering constraints.
//!
//! Each stage is ordered on its own. `a.runs_after(b)` adds the edge
//! `b -> a`, `a.runs_before(b)` adds `a -> b`, and Kahn's algorithm emits
//! the processors with a min-heap of ready registration indices, so
//! unconstrained processors keep the order they were registered in.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::error::CyclicDependencyError;
use crate::processor::{ProcessorDescriptor, Stage};

/// Order the processors of `stage`, given in registration order.
///
/// Returns indices into `descriptors`. Constraints that name no processor
/// of the stage are dropped with a debug log. Processors that cannot be
/// placed because of a cycle are reported in registration order.
pub fn linearize(
    stage: Stage,
    descriptors: &[&ProcessorDescriptor],
) -> Result<Vec<usize>, CyclicDependencyError> {
    let n = descriptors.len();
    let by_name: FxHashMap<&str, usize> = descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.as_str(), i))
        .collect();

    let mut seen: FxHashSet<(usize, usize)> = FxHashSet::default();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    let mut add_edge = |from: usize, to: usize| {
        if seen.insert((from, to)) {
            successors[from].push(to);
            in_degree[to] += 1;
        }
    };

    for (i, descriptor) in descriptors.iter().enumerate() {
        for name in &descriptor.runs_after {
            match by_name.get(name.as_str()) {
                Some(&j) => add_edge(j, i),
                None => debug!(%stage, processor = %descriptor.name, after = %name, "ignoring constraint on unknown processor"),
            }
        }
        for name in &descriptor.runs_before {
            match by_name.get(name.as_str()) {
                Some(&j) => add_edge(i, j),
                None => debug!(%stage, processor = %descriptor.name, before = %name, "ignoring constraint on unknown processor"),
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for &next in &successors[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < n {
        let processors = (0..n)
            .filter(|&i| in_degree[i] > 0)
            .map(|i| descriptors[i].name.clone())
            .collect();
        return Err(CyclicDependencyError { stage, processors });
    }

    trace!(%stage, order = ?order, "linearized");
    Ok(order)
}

/// Reorder `items` by `order`, as returned from [`linearize`].
pub(crate) fn arrange<T: ?Sized>(items: Vec<Box<T>>, order: &[usize]) -> Vec<Box<T>> {
    let mut slots: Vec<Option<Box<T>>> = items.into_iter().map(Some).collect();
    order
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}
