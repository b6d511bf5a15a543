#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod aggregator;
mod almanac;
mod ambiguity;
mod analysis;
mod carrier;
mod cfg;
mod constants;
mod error;
mod estimator;
mod evaluator;
mod initializer;
mod observation;
mod position;
mod report;
mod source;
mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::aggregator::{Aggregator, ConvergenceStatus};
    pub use crate::almanac::{Almanac, AlmanacEntry};
    pub use crate::ambiguity::GroundTruth;
    pub use crate::analysis::{analyze, run};
    pub use crate::carrier::Carrier;
    pub use crate::cfg::Config;
    pub use crate::constants::SPEED_OF_LIGHT_M_S;
    pub use crate::error::{Error, EstimatorError, ParsingError};
    pub use crate::estimator::{AmbiguityConvention, Differencing, Estimator, PhaseSign};
    pub use crate::evaluator::{evaluate, EpochStatus, ResultRow};
    pub use crate::initializer::initialize;
    pub use crate::observation::ObservationMatrix;
    pub use crate::position::ReferencePosition;
    pub use crate::report::{Report, Summary};
    pub use crate::source::{EpochData, EpochSource, Observables};
    pub use crate::time::GpsTime;
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}
