//! Random graph families.
//!
//! Every generator returns a directed [`GraphDocument`] using the edge weight
//! model, source vertex 0, and weights drawn uniformly from `1..=10`. All
//! randomness comes from the caller's [`Rng`], so a seeded [`StdRng`]
//! reproduces the same document on every platform.
//!
//! [`StdRng`]: rand::rngs::StdRng

use rand::Rng;
use sccpath_core::{EdgeSpec, GraphDocument, WeightModel};

use crate::error::DatasetError;

const MIN_WEIGHT: i64 = 1;
const MAX_WEIGHT: i64 = 10;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Builder<'r, R: Rng> {
    rng: &'r mut R,
    n: usize,
    edges: Vec<EdgeSpec>,
}

impl<'r, R: Rng> Builder<'r, R> {
    const fn new(rng: &'r mut R, n: usize) -> Self {
        Self {
            rng,
            n,
            edges: Vec::new(),
        }
    }

    fn edge(&mut self, u: usize, v: usize) {
        let w = self.rng.gen_range(MIN_WEIGHT..=MAX_WEIGHT);
        self.edges.push(EdgeSpec { u, v, w });
    }

    fn coin(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    fn finish(self) -> GraphDocument {
        GraphDocument {
            directed: true,
            n: self.n,
            weight_model: WeightModel::Edge,
            edges: self.edges,
            node_weights: None,
            source: Some(0),
        }
    }
}

fn check_n(family: &'static str, n: usize, min: usize) -> Result<(), DatasetError> {
    if n < min {
        return Err(DatasetError::invalid(
            family,
            format!("need at least {min} vertices, got {n}"),
        ));
    }
    Ok(())
}

fn check_density(family: &'static str, density: f64) -> Result<(), DatasetError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(DatasetError::invalid(
            family,
            format!("density {density} is outside [0, 1]"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// Forward edges `i → j` (`i < j`), each with probability `density`.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `n == 0` or `density ∉ [0, 1]`.
pub fn simple_dag<R: Rng>(
    n: usize,
    density: f64,
    rng: &mut R,
) -> Result<GraphDocument, DatasetError> {
    check_n("simple_dag", n, 1)?;
    check_density("simple_dag", density)?;

    let mut b = Builder::new(rng, n);
    for i in 0..n {
        for j in i + 1..n {
            if b.coin(density) {
                b.edge(i, j);
            }
        }
    }
    Ok(b.finish())
}

/// A Hamiltonian chain `0 → 1 → … → n-1` plus skip edges `i → j`
/// (`j ≥ i + 2`) with probability `density`. Every vertex is reachable from 0.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `n == 0` or `density ∉ [0, 1]`.
pub fn pure_dag<R: Rng>(
    n: usize,
    density: f64,
    rng: &mut R,
) -> Result<GraphDocument, DatasetError> {
    check_n("pure_dag", n, 1)?;
    check_density("pure_dag", density)?;

    let mut b = Builder::new(rng, n);
    for i in 1..n {
        b.edge(i - 1, i);
    }
    for i in 0..n {
        for j in i + 2..n {
            if b.coin(density) {
                b.edge(i, j);
            }
        }
    }
    Ok(b.finish())
}

/// A chain, `cycles` back edges closing random stretches of it, then
/// `⌈0.3 n⌉` random non-self-loop edges.
///
/// A back edge runs `start + k + 1 → start` with `start, k < n / 2`; draws
/// that land past the last vertex are skipped.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `n < 2`.
pub fn with_cycles<R: Rng>(
    n: usize,
    cycles: usize,
    rng: &mut R,
) -> Result<GraphDocument, DatasetError> {
    check_n("with_cycles", n, 2)?;

    let mut b = Builder::new(rng, n);
    for i in 1..n {
        b.edge(i - 1, i);
    }
    for _ in 0..cycles {
        let start = b.rng.gen_range(0..n / 2);
        let end = start + b.rng.gen_range(0..n / 2) + 1;
        if end < n {
            b.edge(end, start);
        }
    }
    for _ in 0..(3 * n).div_ceil(10) {
        let u = b.rng.gen_range(0..n);
        let v = b.rng.gen_range(0..n);
        if u != v {
            b.edge(u, v);
        }
    }
    Ok(b.finish())
}

/// Forward edges with probability `density`, then `cycles` back edges
/// `v → u` with `u < v`.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `n < 2` or `density ∉ [0, 1]`.
pub fn mixed<R: Rng>(
    n: usize,
    density: f64,
    cycles: usize,
    rng: &mut R,
) -> Result<GraphDocument, DatasetError> {
    check_n("mixed", n, 2)?;
    check_density("mixed", density)?;

    let mut b = Builder::new(rng, n);
    for i in 0..n {
        for j in i + 1..n {
            if b.coin(density) {
                b.edge(i, j);
            }
        }
    }
    for _ in 0..cycles {
        let v = b.rng.gen_range(1..n);
        let u = b.rng.gen_range(0..v);
        b.edge(v, u);
    }
    Ok(b.finish())
}

/// `components` blocks of `n / components` consecutive vertices (the last
/// block absorbs the remainder). Each block is a ring plus intra-block
/// edges with probability 0.3; block `i` is bridged to block `i + 1` by one
/// forward edge, so the result has exactly `components` SCCs.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `components == 0` or
/// `components > n`.
pub fn multi_scc<R: Rng>(
    n: usize,
    components: usize,
    rng: &mut R,
) -> Result<GraphDocument, DatasetError> {
    if components == 0 || components > n {
        return Err(DatasetError::invalid(
            "multi_scc",
            format!("component count {components} must be in 1..={n}"),
        ));
    }

    let per_block = n / components;
    let mut b = Builder::new(rng, n);

    for block in 0..components {
        let start = block * per_block;
        let end = if block + 1 == components {
            n
        } else {
            start + per_block
        };

        for i in start..end {
            let next = if i + 1 < end { i + 1 } else { start };
            b.edge(i, next);
        }
        for i in start..end {
            for j in start..end {
                if i != j && b.coin(0.3) {
                    b.edge(i, j);
                }
            }
        }
    }

    for block in 0..components - 1 {
        let from = block * per_block + b.rng.gen_range(0..per_block);
        let to = (block + 1) * per_block + b.rng.gen_range(0..per_block);
        b.edge(from, to);
    }
    Ok(b.finish())
}

/// Every ordered pair `i ≠ j` with probability `density`.
///
/// # Errors
///
/// [`DatasetError::InvalidParameter`] if `n == 0` or `density ∉ [0, 1]`.
pub fn dense<R: Rng>(n: usize, density: f64, rng: &mut R) -> Result<GraphDocument, DatasetError> {
    check_n("dense", n, 1)?;
    check_density("dense", density)?;

    let mut b = Builder::new(rng, n);
    for i in 0..n {
        for j in 0..n {
            if i != j && b.coin(density) {
                b.edge(i, j);
            }
        }
    }
    Ok(b.finish())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sccpath_core::{find_sccs, kahn_sort};

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn weights_stay_in_range() {
        let doc = dense(20, 0.5, &mut rng()).unwrap();
        assert!(!doc.edges.is_empty());
        assert!(doc.edges.iter().all(|e| (1..=10).contains(&e.w)));
        assert!(doc.edges.iter().all(|e| e.u != e.v));
    }

    #[test]
    fn dag_families_are_acyclic() {
        for doc in [
            simple_dag(15, 0.4, &mut rng()).unwrap(),
            pure_dag(15, 0.3, &mut rng()).unwrap(),
        ] {
            let g = doc.to_graph().unwrap();
            assert!(kahn_sort(&g).is_acyclic());
        }
    }

    #[test]
    fn pure_dag_contains_the_chain() {
        let doc = pure_dag(6, 0.0, &mut rng()).unwrap();
        let pairs: Vec<(usize, usize)> = doc.edges.iter().map(|e| (e.u, e.v)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
    }

    #[test]
    fn multi_scc_has_exactly_k_components() {
        for (n, k) in [(15, 3), (35, 5), (7, 7), (10, 1)] {
            let doc = multi_scc(n, k, &mut rng()).unwrap();
            let g = doc.to_graph().unwrap();
            assert_eq!(find_sccs(&g).partition.scc_count(), k, "n={n} k={k}");
        }
    }

    #[test]
    fn mixed_back_edges_point_backwards() {
        let doc = mixed(12, 0.0, 4, &mut rng()).unwrap();
        assert_eq!(doc.edges.len(), 4);
        assert!(doc.edges.iter().all(|e| e.v < e.u));
    }

    #[test]
    fn same_seed_same_document() {
        let a = with_cycles(20, 3, &mut rng()).unwrap();
        let b = with_cycles(20, 3, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(simple_dag(0, 0.5, &mut rng()).is_err());
        assert!(dense(5, 1.5, &mut rng()).is_err());
        assert!(with_cycles(1, 2, &mut rng()).is_err());
        assert!(mixed(1, 0.5, 1, &mut rng()).is_err());
        assert!(multi_scc(3, 0, &mut rng()).is_err());
        let err = multi_scc(3, 4, &mut rng()).unwrap_err();
        assert!(err.to_string().contains("multi_scc"));
    }
}
