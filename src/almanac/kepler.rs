use log::error;
use nalgebra::{Rotation3, Vector3};

use crate::{
    almanac::AlmanacEntry,
    constants::{EARTH_ANGULAR_VEL_RAD, EARTH_GRAVITATION_MU_M3_S2},
    time::GpsTime,
};

impl AlmanacEntry {
    const MAX_KEPLER_ITER: usize = 16;
    const KEPLER_TOLERANCE: f64 = 1.0E-12;

    /// Semi-major axis (in meters)
    pub fn semi_major_axis_m(&self) -> f64 {
        self.sqrt_a.powi(2)
    }

    /// Seconds elapsed since time of applicability
    pub(crate) fn t_k(&self, t: GpsTime) -> f64 {
        t.seconds_since(self.week, self.toa_s)
    }

    /// Resolves Kepler equations and returns the satellite ECEF
    /// position (in meters) at requested [GpsTime].
    /// Returns None if the Kepler iteration does not converge.
    pub fn position_ecef(&self, t: GpsTime) -> Option<Vector3<f64>> {
        let e = self.eccentricity;
        let a = self.semi_major_axis_m();

        let t_k = self.t_k(t);

        let n0 = (EARTH_GRAVITATION_MU_M3_S2 / a.powi(3)).sqrt();
        let m_k = self.m0_rad + n0 * t_k;

        let mut e_k = m_k;
        let mut converged = false;

        for _ in 0..Self::MAX_KEPLER_ITER {
            let e_next = m_k + e * e_k.sin();
            let delta = (e_next - e_k).abs();
            e_k = e_next;
            if delta < Self::KEPLER_TOLERANCE {
                converged = true;
                break;
            }
        }

        if !converged {
            error!("{}(PRN#{}) - kepler solver in failure", t, self.prn);
            return None;
        }

        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let v_k = ((1.0 - e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - e);

        let u_k = v_k + self.omega_rad;
        let r_k = a * (1.0 - e * cos_e_k);

        let omega_k = self.omega0_rad + (self.omega_dot_rad_s - EARTH_ANGULAR_VEL_RAD) * t_k
            - EARTH_ANGULAR_VEL_RAD * self.toa_s;

        let orbital_plane = Vector3::new(r_k * u_k.cos(), r_k * u_k.sin(), 0.0);

        // orbital plane to ECEF
        let rot_x3 = Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination_rad);
        let rot_z3 = Rotation3::from_axis_angle(&Vector3::z_axis(), omega_k);

        Some(rot_z3 * rot_x3 * orbital_plane)
    }
}
