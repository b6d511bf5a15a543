use nalgebra::DMatrix;

use crate::prelude::{EpochData, SV};

/// [ObservationMatrix] is what the estimator consumes:
/// one row per satellite, phase (cycles) in column 0,
/// pseudo range (meters) in column 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMatrix {
    /// Row labels
    pub svs: Vec<SV>,
    /// (n x 2) observations
    pub data: DMatrix<f64>,
}

impl ObservationMatrix {
    /// Stacks [phase row, pseudo range row] and transposes
    /// to per satellite rows.
    pub fn from_observations(observations: &[(SV, f64, f64)]) -> Self {
        let n = observations.len();
        let svs = observations.iter().map(|(sv, _, _)| *sv).collect::<Vec<_>>();

        let stacked = observations
            .iter()
            .map(|(_, phase, _)| *phase)
            .chain(observations.iter().map(|(_, _, pr)| *pr))
            .collect::<Vec<_>>();

        let data = DMatrix::from_row_slice(2, n, &stacked).transpose();

        Self { svs, data }
    }

    /// Builds [ObservationMatrix] from usable observations of this [EpochData],
    /// retaining only the satellites that pass `keep`.
    pub(crate) fn from_epoch<F: Fn(&SV) -> bool>(data: &EpochData, keep: F) -> Self {
        let observations = data
            .usable()
            .filter(|(sv, _, _)| keep(sv))
            .collect::<Vec<_>>();
        Self::from_observations(&observations)
    }

    /// Number of satellites
    pub fn len(&self) -> usize {
        self.svs.len()
    }

    /// True if no satellite is described
    pub fn is_empty(&self) -> bool {
        self.svs.is_empty()
    }

    /// Carrier phase (cycles) of i-th satellite
    pub fn phase(&self, i: usize) -> f64 {
        self.data[(i, 0)]
    }

    /// Pseudo range (meters) of i-th satellite
    pub fn pseudo_range(&self, i: usize) -> f64 {
        self.data[(i, 1)]
    }

    /// Iterates (sv, phase, pseudo range)
    pub fn iter(&self) -> impl Iterator<Item = (SV, f64, f64)> + '_ {
        self.svs
            .iter()
            .enumerate()
            .map(|(i, sv)| (*sv, self.phase(i), self.pseudo_range(i)))
    }
}

#[cfg(test)]
mod test {
    use super::ObservationMatrix;
    use crate::prelude::SV;
    use std::str::FromStr;

    #[test]
    fn per_satellite_rows() {
        let g01 = SV::from_str("G01").unwrap();
        let g05 = SV::from_str("G05").unwrap();
        let g12 = SV::from_str("G12").unwrap();

        let matrix =
            ObservationMatrix::from_observations(&[(g01, 1.0, 10.0), (g05, 2.0, 20.0), (g12, 3.0, 30.0)]);

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.data.nrows(), 3);
        assert_eq!(matrix.data.ncols(), 2);

        assert_eq!(matrix.phase(0), 1.0);
        assert_eq!(matrix.pseudo_range(0), 10.0);
        assert_eq!(matrix.phase(2), 3.0);
        assert_eq!(matrix.pseudo_range(2), 30.0);

        let rows = matrix.iter().collect::<Vec<_>>();
        assert_eq!(rows[1], (g05, 2.0, 20.0));
    }

    #[test]
    fn empty() {
        let matrix = ObservationMatrix::from_observations(&[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.data.ncols(), 2);
    }
}
