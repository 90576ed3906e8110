//! Iterative Tarjan SCC over a dense adjacency list.
//!
//! Components are emitted when their root finishes, so every component
//! appears after the components it depends on (edges point from dependent
//! to dependency). Members within a component are ordered by discovery.

use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

const UNVISITED: u32 = u32::MAX;

/// Compute strongly connected components of a graph with `n` nodes.
///
/// The returned components are in dependency-first order: if any node of
/// component `C1` has an edge into component `C2` (`C1` depends on `C2`),
/// then `C2` appears before `C1`.
#[must_use]
pub fn strongly_connected_components(n: usize, adj: &[Vec<u32>]) -> Vec<Vec<u32>> {
    debug_assert_eq!(adj.len(), n);

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0u32; n];
    let mut on_stack = FixedBitSet::with_capacity(n);
    let mut stack: SmallVec<[u32; 16]> = SmallVec::new();
    let mut next_index = 0u32;
    let mut components: Vec<Vec<u32>> = Vec::new();

    // Explicit DFS frames: (node, next edge offset).
    let mut frames: SmallVec<[(u32, usize); 16]> = SmallVec::new();

    for start in 0..n as u32 {
        if index[start as usize] != UNVISITED {
            continue;
        }
        frames.push((start, 0));
        while let Some(&mut (node, ref mut edge)) = frames.last_mut() {
            let node_idx = node as usize;
            if *edge == 0 {
                index[node_idx] = next_index;
                lowlink[node_idx] = next_index;
                next_index += 1;
                stack.push(node);
                on_stack.insert(node_idx);
            }

            if let Some(&succ) = adj[node_idx].get(*edge) {
                *edge += 1;
                let succ_idx = succ as usize;
                if index[succ_idx] == UNVISITED {
                    frames.push((succ, 0));
                } else if on_stack.contains(succ_idx) {
                    lowlink[node_idx] = lowlink[node_idx].min(index[succ_idx]);
                }
                continue;
            }

            // All successors explored; propagate lowlink and maybe pop a
            // component rooted here.
            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                let parent_idx = parent as usize;
                lowlink[parent_idx] = lowlink[parent_idx].min(lowlink[node_idx]);
            }
            if lowlink[node_idx] == index[node_idx] {
                let mut component = Vec::new();
                loop {
                    let member = stack.pop().expect("tarjan stack underflow");
                    on_stack.set(member as usize, false);
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                // Discovery order within the component.
                component.sort_by_key(|m| index[*m as usize]);
                components.push(component);
            }
        }
    }

    components
}

#[cfg(test)]
#[path = "tests/tarjan_tests.rs"]
mod tests;
