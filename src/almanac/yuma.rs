use std::str::FromStr;

use crate::{
    almanac::{Almanac, AlmanacEntry},
    error::ParsingError,
};

/// YUMA block under construction
#[derive(Default)]
struct Block {
    prn: Option<u8>,
    health: Option<u8>,
    eccentricity: Option<f64>,
    toa_s: Option<f64>,
    inclination_rad: Option<f64>,
    omega_dot_rad_s: Option<f64>,
    sqrt_a: Option<f64>,
    omega0_rad: Option<f64>,
    omega_rad: Option<f64>,
    m0_rad: Option<f64>,
    af0_s: Option<f64>,
    af1_s_s: Option<f64>,
    week: Option<u32>,
}

fn parse<T: FromStr>(line: usize, field: &str, value: &str) -> Result<T, ParsingError> {
    value.trim().parse::<T>().map_err(|_| ParsingError::InvalidField {
        line,
        field: field.to_string(),
    })
}

impl Block {
    fn is_empty(&self) -> bool {
        self.prn.is_none()
    }

    fn set(&mut self, line: usize, key: &str, value: &str) -> Result<(), ParsingError> {
        let key = key.trim().to_lowercase();

        // "Rate of Right Ascen" must be tested prior "Right Ascen"
        if key.starts_with("id") {
            self.prn = Some(parse(line, &key, value)?);
        } else if key.starts_with("health") {
            self.health = Some(parse(line, &key, value)?);
        } else if key.starts_with("eccentricity") {
            self.eccentricity = Some(parse(line, &key, value)?);
        } else if key.starts_with("time of applicability") {
            self.toa_s = Some(parse(line, &key, value)?);
        } else if key.starts_with("orbital inclination") {
            self.inclination_rad = Some(parse(line, &key, value)?);
        } else if key.starts_with("rate of right ascen") {
            self.omega_dot_rad_s = Some(parse(line, &key, value)?);
        } else if key.starts_with("sqrt(a)") {
            self.sqrt_a = Some(parse(line, &key, value)?);
        } else if key.starts_with("right ascen at week") {
            self.omega0_rad = Some(parse(line, &key, value)?);
        } else if key.starts_with("argument of perigee") {
            self.omega_rad = Some(parse(line, &key, value)?);
        } else if key.starts_with("mean anom") {
            self.m0_rad = Some(parse(line, &key, value)?);
        } else if key.starts_with("af0") {
            self.af0_s = Some(parse(line, &key, value)?);
        } else if key.starts_with("af1") {
            self.af1_s_s = Some(parse(line, &key, value)?);
        } else if key.starts_with("week") {
            self.week = Some(parse(line, &key, value)?);
        }
        Ok(())
    }

    fn build(self) -> Result<AlmanacEntry, ParsingError> {
        Ok(AlmanacEntry {
            prn: self.prn.ok_or(ParsingError::MissingField("ID"))?,
            health: self.health.unwrap_or_default(),
            eccentricity: self
                .eccentricity
                .ok_or(ParsingError::MissingField("Eccentricity"))?,
            toa_s: self
                .toa_s
                .ok_or(ParsingError::MissingField("Time of Applicability"))?,
            inclination_rad: self
                .inclination_rad
                .ok_or(ParsingError::MissingField("Orbital Inclination"))?,
            omega_dot_rad_s: self
                .omega_dot_rad_s
                .ok_or(ParsingError::MissingField("Rate of Right Ascen"))?,
            sqrt_a: self.sqrt_a.ok_or(ParsingError::MissingField("SQRT(A)"))?,
            omega0_rad: self
                .omega0_rad
                .ok_or(ParsingError::MissingField("Right Ascen at Week"))?,
            omega_rad: self
                .omega_rad
                .ok_or(ParsingError::MissingField("Argument of Perigee"))?,
            m0_rad: self.m0_rad.ok_or(ParsingError::MissingField("Mean Anom"))?,
            af0_s: self.af0_s.unwrap_or_default(),
            af1_s_s: self.af1_s_s.unwrap_or_default(),
            week: self.week.ok_or(ParsingError::MissingField("week"))?,
        })
    }
}

impl FromStr for Almanac {
    type Err = ParsingError;

    /// Parses YUMA almanac content
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut entries = Vec::<AlmanacEntry>::with_capacity(32);
        let mut block = Block::default();

        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();

            if trimmed.starts_with("****") {
                let done = std::mem::take(&mut block);
                if !done.is_empty() {
                    entries.push(done.build()?);
                }
                continue;
            }

            if let Some((key, value)) = trimmed.split_once(':') {
                block.set(line_number, key, value)?;
            }
        }

        if !block.is_empty() {
            entries.push(block.build()?);
        }

        if entries.is_empty() {
            return Err(ParsingError::EmptyAlmanac);
        }

        let mut almanac = Almanac::default();

        for entry in entries {
            if almanac.entries.insert(entry.prn, entry).is_some() {
                return Err(ParsingError::DuplicatePrn(entry.prn));
            }
        }

        Ok(almanac)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        error::ParsingError,
        prelude::{Almanac, SV},
        tests::YUMA_ALMANAC,
    };
    use std::str::FromStr;

    #[test]
    fn yuma_parsing() {
        let almanac = Almanac::from_str(YUMA_ALMANAC).unwrap();

        assert_eq!(almanac.len(), 6);

        let g01 = almanac.get(1).unwrap();
        assert_eq!(g01.prn, 1);
        assert!(g01.is_healthy());
        assert_eq!(g01.week, 63);
        assert_eq!(g01.toa_s, 319488.0);
        assert!((g01.sqrt_a - 5153.655273).abs() < 1.0E-6);
        assert!((g01.eccentricity - 0.8945465088E-002).abs() < 1.0E-12);
        assert!((g01.omega_dot_rad_s + 0.7817468714E-008).abs() < 1.0E-18);

        assert!(almanac.get(2).is_none());
        assert!(almanac.get(12).is_some());

        let g12 = SV::from_str("G12").unwrap();
        let e12 = SV::from_str("E12").unwrap();
        assert!(almanac.get_sv(g12).is_some());
        assert!(almanac.get_sv(e12).is_none());
    }

    #[test]
    fn yuma_missing_field() {
        let content = "******** Week 63 almanac for PRN-01 ********
ID:                         01
Health:                     000
week:                        63";

        assert_eq!(
            Almanac::from_str(content),
            Err(ParsingError::MissingField("Eccentricity"))
        );
    }

    #[test]
    fn yuma_invalid_field() {
        let content = "******** Week 63 almanac for PRN-01 ********
ID:                         01
Eccentricity:               abc";

        assert_eq!(
            Almanac::from_str(content),
            Err(ParsingError::InvalidField {
                line: 3,
                field: "eccentricity".to_string(),
            })
        );
    }

    #[test]
    fn yuma_duplicate_prn() {
        let content = format!("{}\n{}", YUMA_ALMANAC, YUMA_ALMANAC);
        assert_eq!(
            Almanac::from_str(&content),
            Err(ParsingError::DuplicatePrn(1))
        );
    }

    #[test]
    fn yuma_empty() {
        assert_eq!(Almanac::from_str(""), Err(ParsingError::EmptyAlmanac));
    }
}
