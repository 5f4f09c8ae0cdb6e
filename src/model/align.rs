//! Alignment of coefficient structures onto a common variable basis.
//!
//! Every expression stores its coefficients against its own [`VarVector`].
//! To add two expressions over different bases, both are rewritten into the
//! deduplicated concatenation of the two bases and then added slot by slot.
//!
//! Rewriting works from a *slot map*: for every slot `i` of the old basis,
//! `map[i]` is the slot in the new basis holding the same variable id.
//! Coefficients are accumulated into their new slot, never overwritten, so
//! duplicate ids in the old basis fold together.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use super::{error::ExprError, var_vector::VarVector, variable::Variable};

/// Unique union of two bases, with the slot map of each side into it
///
/// The union keeps every variable of `a` in order, followed by the variables
/// of `b` that `a` does not contain. Both maps are built while the union is
/// assembled, so this cannot fail.
pub(crate) struct Union {
    pub basis: VarVector,
    pub lhs_map: Vec<usize>,
    pub rhs_map: Vec<usize>,
}

pub(crate) fn union(a: &VarVector, b: &VarVector) -> Union {
    let mut basis = VarVector::default();
    let mut slots: HashMap<u64, usize> = HashMap::with_capacity(a.len() + b.len());

    let mut slot_of = |variable: &Variable| -> usize {
        *slots.entry(variable.id()).or_insert_with(|| {
            basis.push(*variable);
            basis.len() - 1
        })
    };

    let lhs_map: Vec<usize> = a.iter().map(&mut slot_of).collect();
    let rhs_map: Vec<usize> = b.iter().map(&mut slot_of).collect();

    Union {
        basis,
        lhs_map,
        rhs_map,
    }
}

/// `unique(a ++ b)`: the basis two expressions are aligned onto
pub fn unique_union(a: &VarVector, b: &VarVector) -> VarVector {
    union(a, b).basis
}

/// Deduplicated basis of `vars` together with the map of `vars` into it
pub(crate) fn fold(vars: &VarVector) -> (VarVector, Vec<usize>) {
    let Union { basis, lhs_map, .. } = union(vars, &VarVector::default());
    (basis, lhs_map)
}

/// Slot map of `old` into `new`
///
/// Fails with [`ExprError::Reindex`] on the first variable of `old` that
/// `new` does not contain. When `new` holds an id more than once, the first
/// occurrence is used.
pub fn slot_map(old: &VarVector, new: &VarVector) -> Result<Vec<usize>, ExprError> {
    let mut slots: HashMap<u64, usize> = HashMap::with_capacity(new.len());
    for (slot, variable) in new.iter().enumerate() {
        slots.entry(variable.id()).or_insert(slot);
    }

    old.iter()
        .map(|variable| {
            slots
                .get(&variable.id())
                .copied()
                .ok_or(ExprError::Reindex { id: variable.id() })
        })
        .collect()
}

/// Rewrite a coefficient vector: `out[map[i]] += coeffs[i]`
pub(crate) fn remap_vector(coeffs: &DVector<f64>, map: &[usize], width: usize) -> DVector<f64> {
    let mut out = DVector::zeros(width);
    for (i, &j) in map.iter().enumerate() {
        out[j] += coeffs[i];
    }
    out
}

/// Rewrite a square matrix along both axes: `out[map[i1], map[i2]] += q[i1, i2]`
pub(crate) fn remap_square(q: &DMatrix<f64>, map: &[usize], width: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(width, width);
    for (i1, &j1) in map.iter().enumerate() {
        for (i2, &j2) in map.iter().enumerate() {
            out[(j1, j2)] += q[(i1, i2)];
        }
    }
    out
}

/// Rewrite the columns of an `m×n` matrix, leaving the rows in place
pub(crate) fn remap_columns(l: &DMatrix<f64>, map: &[usize], width: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(l.nrows(), width);
    for (i, &j) in map.iter().enumerate() {
        for row in 0..l.nrows() {
            out[(row, j)] += l[(row, i)];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VariableType;

    fn var(id: u64) -> Variable {
        Variable::new(id, 0.0, 1.0, VariableType::Continuous)
    }

    #[test]
    fn test_union_keeps_lhs_order_then_novel_rhs() {
        let a = VarVector::new(vec![var(0), var(1)]);
        let b = VarVector::new(vec![var(1), var(2)]);

        let u = union(&a, &b);

        assert_eq!(u.basis.ids(), vec![0, 1, 2]);
        assert_eq!(u.lhs_map, vec![0, 1]);
        assert_eq!(u.rhs_map, vec![1, 2]);
    }

    #[test]
    fn test_union_folds_duplicates_inside_one_side() {
        let a = VarVector::new(vec![var(3), var(3), var(5)]);

        let (basis, map) = fold(&a);

        assert_eq!(basis.ids(), vec![3, 5]);
        assert_eq!(map, vec![0, 0, 1]);
    }

    #[test]
    fn test_slot_map_rejects_missing_variable() {
        let old = VarVector::new(vec![var(0), var(4)]);
        let new = VarVector::new(vec![var(0), var(1), var(2)]);

        assert_eq!(slot_map(&old, &new), Err(ExprError::Reindex { id: 4 }));
    }

    #[test]
    fn test_slot_map_into_superset() {
        let old = VarVector::new(vec![var(2), var(0)]);
        let new = VarVector::new(vec![var(0), var(1), var(2)]);

        assert_eq!(slot_map(&old, &new), Ok(vec![2, 0]));
    }

    #[test]
    fn test_remap_vector_accumulates() {
        let coeffs = DVector::from_vec(vec![1.0, 2.0, 4.0]);

        let out = remap_vector(&coeffs, &[1, 1, 0], 3);

        assert_eq!(out.as_slice(), &[4.0, 3.0, 0.0]);
    }

    #[test]
    fn test_remap_square_moves_both_axes() {
        let q = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);

        let out = remap_square(&q, &[2, 0], 3);

        assert_eq!(out[(2, 2)], 1.0);
        assert_eq!(out[(2, 0)], 2.0);
        assert_eq!(out[(0, 2)], 3.0);
        assert_eq!(out[(0, 0)], 4.0);
        assert_eq!(out.row(1).iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_remap_columns_keeps_rows() {
        let l = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);

        let out = remap_columns(&l, &[1, 1], 3);

        assert_eq!(out.nrows(), 2);
        assert_eq!(out.ncols(), 3);
        assert_eq!(out[(0, 1)], 3.0);
        assert_eq!(out[(1, 1)], 7.0);
        assert_eq!(out[(0, 0)], 0.0);
    }
}
