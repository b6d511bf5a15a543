mod analysis;

pub use estimator::RoundingEstimator;
pub use scenario::SyntheticScenario;

use log::LevelFilter;
use std::{str::FromStr, sync::Once};

use crate::prelude::{Almanac, Constellation, SV};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Week 63 (2111) YUMA almanac, PRN 1, 5, 12, 17, 23 and 30
pub const YUMA_ALMANAC: &str = include_str!("../../data/almanac.alm");

pub fn almanac() -> Almanac {
    Almanac::from_str(YUMA_ALMANAC).unwrap()
}

pub const G01: SV = SV {
    constellation: Constellation::GPS,
    prn: 1,
};

pub const G02: SV = SV {
    constellation: Constellation::GPS,
    prn: 2,
};

pub const G05: SV = SV {
    constellation: Constellation::GPS,
    prn: 5,
};

pub const G12: SV = SV {
    constellation: Constellation::GPS,
    prn: 12,
};

pub const G17: SV = SV {
    constellation: Constellation::GPS,
    prn: 17,
};

pub const G23: SV = SV {
    constellation: Constellation::GPS,
    prn: 23,
};
