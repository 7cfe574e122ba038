use std::collections::BTreeMap;

use crate::{DistanceMatrix, Error, Parameters, Result};

/// Waypoint index to weighting parameters for that waypoint. Waypoints
/// without an entry keep their costs as-is.
pub type ParameterMap = BTreeMap<usize, Parameters>;

/// Returns a copy of `matrix` with every weighted waypoint's inbound
/// costs scaled by its parameter factor.
///
/// For a waypoint `i` with factor `f`, every entry `[j][i]` with `j != i`
/// becomes `f * [j][i]`: arriving at `i` gets cheaper, leaving it does
/// not. The input is untouched, so callers keep it around to price the
/// winning tour at true cost.
///
/// Fails with [`Error::InvalidParameter`] on an out-of-range parameter
/// and [`Error::InvalidMatrix`] on an index past the table, before any
/// scaling happens.
pub fn adjust(matrix: &DistanceMatrix, params: &ParameterMap) -> Result<DistanceMatrix> {
    let size = matrix.size();
    for (&index, entry) in params {
        if index >= size {
            return Err(Error::invalid_matrix(format!(
                "parameters reference waypoint {index} but the matrix covers {size}"
            )));
        }
        entry.validate()?;
    }

    let mut rows = matrix.rows();
    for (&index, entry) in params {
        let factor = entry.factor();
        for (j, row) in rows.iter_mut().enumerate() {
            if j != index {
                row[index] *= factor;
            }
        }
    }
    DistanceMatrix::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ])
        .unwrap()
    }

    fn single(index: usize, params: Parameters) -> ParameterMap {
        ParameterMap::from([(index, params)])
    }

    #[test]
    fn minimum_parameters_keep_ninety_percent() {
        let adjusted = adjust(&base(), &single(1, Parameters::new(1, 1, 1).unwrap())).unwrap();
        assert_eq!(adjusted.get(0, 1), 9.0);
        assert_eq!(adjusted.get(2, 1), 18.0);
    }

    #[test]
    fn maximum_parameters_zero_the_inbound_column() {
        let adjusted = adjust(&base(), &single(1, Parameters::new(10, 10, 10).unwrap())).unwrap();
        assert_eq!(adjusted.get(0, 1), 0.0);
        assert_eq!(adjusted.get(2, 1), 0.0);
    }

    #[test]
    fn outbound_costs_and_diagonal_are_untouched() {
        let adjusted = adjust(&base(), &single(1, Parameters::new(10, 10, 10).unwrap())).unwrap();
        assert_eq!(adjusted.get(1, 0), 10.0);
        assert_eq!(adjusted.get(1, 2), 20.0);
        assert_eq!(adjusted.get(1, 1), 0.0);
        assert_eq!(adjusted.get(0, 2), 15.0);
    }

    #[test]
    fn unweighted_waypoints_are_left_alone() {
        let adjusted = adjust(&base(), &single(2, Parameters::new(5, 5, 5).unwrap())).unwrap();
        assert_eq!(adjusted.get(0, 1), 10.0);
        assert_eq!(adjusted.get(1, 0), 10.0);
        assert_eq!(adjusted.get(0, 2), 7.5);
    }

    #[test]
    fn empty_map_is_an_identity() {
        let adjusted = adjust(&base(), &ParameterMap::new()).unwrap();
        assert_eq!(adjusted, base());
    }

    #[test]
    fn same_inputs_give_the_same_output() {
        let params = single(0, Parameters::new(3, 7, 2).unwrap());
        let first = adjust(&base(), &params).unwrap();
        let second = adjust(&base(), &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_an_index_past_the_table() {
        let err = adjust(&base(), &single(3, Parameters::new(1, 1, 1).unwrap())).unwrap_err();
        assert!(matches!(err, Error::InvalidMatrix(_)));
        assert!(err.to_string().contains("waypoint 3"));
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let bad = Parameters { p1: 0, p2: 5, p3: 5 };
        assert!(matches!(
            adjust(&base(), &single(1, bad)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn weights_multiple_waypoints_independently() {
        let params = ParameterMap::from([
            (1, Parameters::new(10, 10, 10).unwrap()),
            (2, Parameters::new(1, 1, 1).unwrap()),
        ]);
        let adjusted = adjust(&base(), &params).unwrap();
        assert_eq!(adjusted.get(0, 1), 0.0);
        assert_eq!(adjusted.get(0, 2), 13.5);
        assert_eq!(adjusted.get(1, 2), 18.0);
    }
}
