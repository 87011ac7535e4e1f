//! Counting and enumerating the instances of a specification tree.
//!
//! An instance of a bounded node with `k` edges takes a subset of its edges whose size lies within
//! the bounds of the node, and an instance of the destination of every edge it takes. The number of
//! instances is therefore a sum over the admissible subsets of the products of the instance counts
//! of the chosen destinations.
use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::instance::{NodeValue, TscInstanceEdge, TscInstanceNode};

use super::{NodeKind, TscNode};

/// All subsets of `items`, ordered ascending by size.
///
/// The elements of every subset keep their order in `items`, and subsets of the same size are
/// ordered as produced by the recursion `powerlist(L) = powerlist(L - last) ++ [s + last]`.
///
/// ```rust
/// use tscmon::tree::combinatorics::powerlist;
///
/// assert_eq!(powerlist(&[1, 2]), vec![vec![], vec![1], vec![2], vec![1, 2]]);
/// ```
pub fn powerlist<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    let Some((last, rest)) = items.split_last() else {
        return vec![vec![]];
    };

    let without = powerlist(rest);
    let with = without.iter().cloned().map(|mut subset| {
        subset.push(last.clone());
        subset
    });

    let mut subsets: Vec<Vec<T>> = without.iter().cloned().chain(with).collect();
    subsets.sort_by_key(Vec::len);
    subsets
}

/// Every combination that takes one element from each of `lists`, in order.
///
/// The first list varies slowest. The cross product of no lists is a single empty combination, and
/// the cross product involving an empty list is empty.
pub fn cross_product<T, L>(lists: &[L]) -> Vec<Vec<T>>
where
    T: Clone,
    L: AsRef<[T]>,
{
    lists.iter().fold(vec![vec![]], |combinations, list| {
        combinations
            .iter()
            .flat_map(|prefix| {
                list.as_ref().iter().map(move |item| {
                    let mut combination = prefix.clone();
                    combination.push(item.clone());
                    combination
                })
            })
            .collect()
    })
}

/// Exact binomial coefficient `C(n, k)`.
pub fn binomial(n: usize, k: usize) -> BigUint {
    if k > n {
        return BigUint::zero();
    }

    let k = k.min(n - k);
    let mut result = BigUint::one();

    for i in 0..k {
        result *= BigUint::from(n - i);
        result /= BigUint::from(i + 1);
    }

    result
}

/// Count the valid instances of the tree rooted at `node`.
pub fn count_all_instances<U, E>(node: &TscNode<U, E>) -> BigUint {
    let NodeKind::Bounded { edges, bounds } = node.kind() else {
        return BigUint::one();
    };

    let counts: Vec<BigUint> = edges
        .iter()
        .map(|edge| count_all_instances(edge.destination()))
        .collect();

    if counts.iter().all(BigUint::is_one) {
        let k = counts.len();

        if bounds.is_unconstrained(k) {
            BigUint::one() << k
        } else {
            (bounds.lower()..=bounds.upper()).map(|size| binomial(k, size)).sum()
        }
    } else {
        powerlist(&counts)
            .into_iter()
            .filter(|subset| bounds.contains(subset.len()))
            .map(|subset| subset.into_iter().product::<BigUint>())
            .sum()
    }
}

fn empty_instance<U, E>(node: &TscNode<U, E>, edges: Vec<TscInstanceEdge>) -> TscInstanceNode {
    TscInstanceNode::new(node.label(), node.bounds(), BTreeMap::new(), NodeValue::None, edges)
}

/// Generate every valid instance of the tree rooted at `node`.
///
/// Instances are ordered by the number of edges taken at the root, then by the position of the
/// chosen edges, then by the instances of the chosen destinations. Generated instances carry no
/// monitor results and no values, and none of their edges is unknown.
pub fn generate_all_instances<U, E>(node: &TscNode<U, E>) -> Vec<TscInstanceNode> {
    let NodeKind::Bounded { edges, bounds } = node.kind() else {
        return vec![empty_instance(node, Vec::new())];
    };

    let options: Vec<Vec<TscInstanceEdge>> = edges
        .iter()
        .map(|edge| {
            generate_all_instances(edge.destination())
                .into_iter()
                .map(|destination| TscInstanceEdge::new(edge.label(), destination, false))
                .collect()
        })
        .collect();

    let indices: Vec<usize> = (0..options.len()).collect();

    powerlist(&indices)
        .into_iter()
        .filter(|subset| bounds.contains(subset.len()))
        .flat_map(|subset| {
            let chosen: Vec<&[TscInstanceEdge]> = subset.iter().map(|&index| options[index].as_slice()).collect();
            cross_product(chosen.as_slice())
        })
        .map(|children| empty_instance(node, children))
        .collect()
}
