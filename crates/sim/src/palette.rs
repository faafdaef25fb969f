//! Named color palettes for density injection.

use glam::Vec4;
use rand::Rng;

/// Five RGBA stops under a stable name. Density splats pick one stop
/// uniformly at random per impulse.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub stops: [Vec4; 5],
}

pub const OCEAN: Palette = Palette {
    name: "ocean",
    stops: [
        Vec4::new(0.0, 0.0, 0.07, 1.0),
        Vec4::new(0.01, 0.13, 0.39, 1.0),
        Vec4::new(0.01, 0.24, 0.49, 1.0),
        Vec4::new(0.0, 0.59, 0.78, 1.0),
        Vec4::new(0.28, 0.79, 0.89, 1.0),
    ],
};

pub const LAVA: Palette = Palette {
    name: "lava",
    stops: [
        Vec4::new(0.22, 0.02, 0.09, 1.0),
        Vec4::new(0.42, 0.02, 0.06, 1.0),
        Vec4::new(0.62, 0.01, 0.03, 1.0),
        Vec4::new(0.82, 0.0, 0.0, 1.0),
        Vec4::new(0.86, 0.18, 0.01, 1.0),
    ],
};

pub const NEBULA: Palette = Palette {
    name: "nebula",
    stops: [
        Vec4::new(0.14, 0.0, 0.27, 1.0),
        Vec4::new(0.24, 0.04, 0.42, 1.0),
        Vec4::new(0.35, 0.09, 0.60, 1.0),
        Vec4::new(0.48, 0.17, 0.75, 1.0),
        Vec4::new(0.62, 0.31, 0.87, 1.0),
    ],
};

pub const FOREST: Palette = Palette {
    name: "forest",
    stops: [
        Vec4::new(0.03, 0.11, 0.08, 1.0),
        Vec4::new(0.11, 0.26, 0.20, 1.0),
        Vec4::new(0.18, 0.42, 0.31, 1.0),
        Vec4::new(0.25, 0.57, 0.42, 1.0),
        Vec4::new(0.32, 0.72, 0.53, 1.0),
    ],
};

pub const SUNSET: Palette = Palette {
    name: "sunset",
    stops: [
        Vec4::new(1.0, 0.47, 0.0, 1.0),
        Vec4::new(1.0, 0.62, 0.0, 1.0),
        Vec4::new(1.0, 0.72, 0.0, 1.0),
        Vec4::new(1.0, 0.82, 0.0, 1.0),
        Vec4::new(1.0, 0.92, 0.0, 1.0),
    ],
};

pub const NEON: Palette = Palette {
    name: "neon",
    stops: [
        Vec4::new(1.0, 0.0, 0.5, 1.0),
        Vec4::new(1.0, 0.0, 1.0, 1.0),
        Vec4::new(0.5, 0.0, 1.0, 1.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
        Vec4::new(0.0, 0.5, 1.0, 1.0),
    ],
};

pub const ALL: [&Palette; 6] = [&OCEAN, &LAVA, &NEBULA, &FOREST, &SUNSET, &NEON];

/// Looks a palette up by name. Unknown names fall back to ocean.
pub fn by_name(name: &str) -> &'static Palette {
    match ALL.iter().copied().find(|p| p.name == name) {
        Some(p) => p,
        None => {
            log::warn!("unknown palette {name:?}, falling back to ocean");
            &OCEAN
        }
    }
}

impl Palette {
    /// Picks one stop uniformly at random.
    pub fn random_stop<R: Rng>(&self, rng: &mut R) -> Vec4 {
        self.stops[rng.gen_range(0..self.stops.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn unknown_name_falls_back_to_ocean() {
        assert_eq!(by_name("galaxy").stops, OCEAN.stops);
        assert_eq!(by_name("").stops, OCEAN.stops);
        assert_eq!(by_name("lava").stops, LAVA.stops);
    }

    #[test]
    fn random_stop_always_comes_from_the_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let stop = NEON.random_stop(&mut rng);
            assert!(NEON.stops.contains(&stop));
        }
    }
}
