//! Reference (base antenna) position
use map_3d::{deg2rad, geodetic2ecef, Ellipsoid};
use serde::{Deserialize, Serialize};

use crate::prelude::Vector3;

/// [ReferencePosition] of the base antenna. Either described
/// in ECEF or by its geodetic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePosition {
    /// ECEF coordinates in meters
    Ecef([f64; 3]),
    /// Geodetic coordinates on WGS84 ellipsoid
    Geodetic {
        /// latitude [°]
        latitude_deg: f64,
        /// longitude [°]
        longitude_deg: f64,
        /// altitude above ellipsoid [m]
        altitude_m: f64,
    },
}

impl Default for ReferencePosition {
    fn default() -> Self {
        Self::Ecef([0.0; 3])
    }
}

impl ReferencePosition {
    /// Builds new [ReferencePosition] from geodetic coordinates
    /// - latitude [°]
    /// - longitude [°]
    /// - altitude above ellipsoid [m]
    pub fn from_geodetic_deg(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self::Geodetic {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    /// Returns ECEF coordinates, in meters.
    pub fn ecef(&self) -> Vector3<f64> {
        match self {
            Self::Ecef([x, y, z]) => Vector3::new(*x, *y, *z),
            Self::Geodetic {
                latitude_deg,
                longitude_deg,
                altitude_m,
            } => {
                let (x, y, z) = geodetic2ecef(
                    deg2rad(*latitude_deg),
                    deg2rad(*longitude_deg),
                    *altitude_m,
                    Ellipsoid::WGS84,
                );
                Vector3::new(x, y, z)
            },
        }
    }
}
