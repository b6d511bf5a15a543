/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Earth gravitational constant (m^3 s-2), WGS84 value used by GPS
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = 3.986005E14;

/// Duration of one GPS week, in seconds
pub const SECONDS_PER_WEEK: f64 = 604_800.0;

/// GPS week counter rollover, as broadcast in almanacs
pub const WEEK_ROLLOVER: i64 = 1024;
