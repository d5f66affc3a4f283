//! Ordering of the equations so that each one is evaluated after the equations it reads

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::design::equation::Equation;
use crate::design::pin::PinId;

/// Combinational equations that could not be ordered because they depend on each other
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombinationalLoop {
    /// Destination pins of the unordered equations, in source order
    pub pins: Vec<PinId>,
}

/// Reorder the equations for evaluation
///
/// Combinational, tristate and enable equations come first, each after the equations driving
/// the pins it reads. Among equations that are ready, the one appearing first in the input is
/// taken first, so that an already ordered list is returned unchanged.
/// Registered equations read the previous state only: they come last, in their original order.
pub fn resolve(equations: &[Equation]) -> Result<Vec<Equation>, CombinationalLoop> {
    let comb: Vec<&Equation> = equations.iter().filter(|e| e.mode().is_comb()).collect();

    // Equations driving each pin; a tristate pin has both its .T and .E equations here
    let mut drivers: FxHashMap<PinId, Vec<usize>> = FxHashMap::default();
    for (i, eq) in comb.iter().enumerate() {
        drivers.entry(eq.pin()).or_default().push(i);
    }

    // Count the dependencies of each equation and record who uses it
    let mut count_deps = vec![0u32; comb.len()];
    let mut users: Vec<Vec<usize>> = vec![Vec::new(); comb.len()];
    for (i, eq) in comb.iter().enumerate() {
        let deps = eq
            .dependencies()
            .filter_map(|d| drivers.get(&d.pin()))
            .flatten()
            .copied()
            .filter(|d| *d != i)
            .sorted_unstable()
            .dedup();
        for d in deps {
            count_deps[i] += 1;
            users[d].push(i);
        }
    }

    // Start with equations that only read inputs and registered pins
    let mut to_visit: BinaryHeap<Reverse<usize>> = (0..comb.len())
        .filter(|i| count_deps[*i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(equations.len());
    while let Some(Reverse(i)) = to_visit.pop() {
        order.push(i);
        for u in &users[i] {
            count_deps[*u] -= 1;
            if count_deps[*u] == 0 {
                to_visit.push(Reverse(*u));
            }
        }
    }

    if order.len() != comb.len() {
        let pins = (0..comb.len())
            .filter(|i| count_deps[*i] != 0)
            .map(|i| comb[i].pin())
            .dedup()
            .collect();
        return Err(CombinationalLoop { pins });
    }

    let mut ret: Vec<Equation> = order.into_iter().map(|i| comb[i].clone()).collect();
    ret.extend(equations.iter().filter(|e| !e.mode().is_comb()).cloned());
    Ok(ret)
}
