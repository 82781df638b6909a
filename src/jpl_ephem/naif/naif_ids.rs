//! NAIF integer codes of the bodies found in planetary SPK kernels.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaifId {
    SolarSystemBarycenter,
    /// Barycenter of planet system 1 (Mercury) to 9 (Pluto).
    PlanetBarycenter(u8),
    Sun,
    /// Any other code, kept as read.
    Other(i32),
}

impl NaifId {
    pub fn from_id(id: i32) -> Self {
        match id {
            0 => NaifId::SolarSystemBarycenter,
            1..=9 => NaifId::PlanetBarycenter(id as u8),
            10 => NaifId::Sun,
            _ => NaifId::Other(id),
        }
    }

    pub fn to_id(self) -> i32 {
        match self {
            NaifId::SolarSystemBarycenter => 0,
            NaifId::PlanetBarycenter(k) => k as i32,
            NaifId::Sun => 10,
            NaifId::Other(id) => id,
        }
    }
}

impl From<i32> for NaifId {
    fn from(id: i32) -> Self {
        NaifId::from_id(id)
    }
}

impl fmt::Display for NaifId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PLANETS: [&str; 9] = [
            "Mercury", "Venus", "Earth-Moon", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
            "Pluto",
        ];
        match self {
            NaifId::SolarSystemBarycenter => write!(f, "Solar System Barycenter"),
            NaifId::PlanetBarycenter(k) => {
                write!(f, "{} Barycenter", PLANETS[(*k as usize).saturating_sub(1).min(8)])
            }
            NaifId::Sun => write!(f, "Sun"),
            NaifId::Other(id) => write!(f, "NAIF {id}"),
        }
    }
}
