use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Identifier for the visual theme a world is rendered with.  Picking
/// actual colors is the rendering collaborator's concern.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Theme {
    Classic,
    Ocean,
    Sunset,
    Royal,
    Cherry,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
            Theme::Royal => "royal",
            Theme::Cherry => "cherry",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A themed stage of the journey: display metadata plus the glyph set its
/// food is drawn from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct World {
    /// Display name
    pub name: &'static str,

    /// One-line description for the rendering layer
    pub description: &'static str,

    /// The food glyphs this world cycles through; unique within the world
    pub glyphs: &'static [char],

    /// Theme to render the world with
    pub theme: Theme,
}

/// The fixed journey through time and cultures.  Progression cycles through
/// these indefinitely; indexing past the end wraps to the start.
pub const WORLDS: &[World] = &[
    World {
        name: "Basic Symbols",
        description: "Simple geometric shapes to begin the journey",
        glyphs: &['●', '○', '■', '□', '▲', '▼', '◆', '◇', '★', '☆'],
        theme: Theme::Classic,
    },
    World {
        name: "Ancient Egypt",
        description: "Hieroglyphic symbols from the land of pharaohs",
        glyphs: &['𓀀', '𓂀', '𓃀', '𓆣', '𓅱', '𓊖', '𓊗', '𓊘', '𓊙', '𓊚'],
        theme: Theme::Ocean,
    },
    World {
        name: "Classical Greece",
        description: "Letters and symbols from ancient Greek civilization",
        glyphs: &['Α', 'Β', 'Γ', 'Δ', 'Θ', 'Λ', 'Ξ', 'Π', 'Σ', 'Ω'],
        theme: Theme::Sunset,
    },
    World {
        name: "Norse Runes",
        description: "Mystical runes from the Viking age",
        glyphs: &['ᚠ', 'ᚢ', 'ᚦ', 'ᚨ', 'ᚱ', 'ᚲ', 'ᚷ', 'ᚹ', 'ᚺ', 'ᚾ'],
        theme: Theme::Royal,
    },
    World {
        name: "Alchemical Mysteries",
        description: "Symbols from medieval alchemy and mysticism",
        glyphs: &['🜁', '🜄', '🜍', '🜔', '🜛', '🜠', '🜨', '🜩', '🜪', '🜫'],
        theme: Theme::Cherry,
    },
    World {
        name: "Mathematical Realm",
        description: "Logic and mathematical symbols",
        glyphs: &['∴', '∵', '∞', '∇', '∂', '∫', '∑', '∏', '√', '∛'],
        theme: Theme::Classic,
    },
    World {
        name: "Global Currencies",
        description: "Currency symbols from around the world",
        glyphs: &['₹', '₽', '₩', '₪', '₫', '₦', '₨', '₱', '₡', '₵'],
        theme: Theme::Ocean,
    },
    World {
        name: "Digital Age",
        description: "Modern symbols and special characters",
        glyphs: &['◉', '◈', '◊', '◌', '◍', '◎', '●', '◑', '◒', '◓'],
        theme: Theme::Sunset,
    },
];

/// The world at `index`, wrapping past the end of the journey.
pub fn world_at(index: usize) -> &'static World {
    &WORLDS[index % WORLDS.len()]
}

/// One shuffle bag of food glyphs per world, filled lazily.
///
/// Within a world no glyph repeats until the whole set has been shown once;
/// a drained bag is refilled from the world's canonical glyph list and
/// reshuffled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WorldPath {
    bags: Vec<Vec<char>>,
}

impl Default for WorldPath {
    fn default() -> WorldPath {
        WorldPath::new()
    }
}

impl WorldPath {
    pub(crate) fn new() -> WorldPath {
        WorldPath {
            bags: vec![Vec::new(); WORLDS.len()],
        }
    }

    /// Draw the next food glyph for the world at `index`.
    pub(crate) fn draw_glyph<R: Rng>(&mut self, index: usize, rng: &mut R) -> char {
        let index = index % WORLDS.len();
        let bag = &mut self.bags[index];
        if bag.is_empty() {
            bag.extend_from_slice(WORLDS[index].glyphs);
            bag.shuffle(rng);
        }
        bag.pop().expect("bag was just refilled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::collections::HashSet;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[test]
    fn indexing_wraps() {
        assert_eq!(world_at(WORLDS.len()), world_at(0));
        assert_eq!(world_at(WORLDS.len() + 3), world_at(3));
    }

    #[test]
    fn glyphs_unique_within_world() {
        for world in WORLDS {
            let unique = world.glyphs.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), world.glyphs.len(), "{}", world.name);
        }
    }

    #[test]
    fn no_repeats_until_bag_drains() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut path = WorldPath::new();
        let glyphs = WORLDS[0].glyphs;
        let drawn = (0..glyphs.len())
            .map(|_| path.draw_glyph(0, &mut rng))
            .collect::<HashSet<_>>();
        assert_eq!(drawn, glyphs.iter().copied().collect::<HashSet<_>>());
        // the bag has refilled, so the next draw revisits a seen glyph
        assert!(drawn.contains(&path.draw_glyph(0, &mut rng)));
    }

    #[test]
    fn bags_are_independent_per_world() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let mut path = WorldPath::new();
        let egypt = path.draw_glyph(1, &mut rng);
        assert!(WORLDS[1].glyphs.contains(&egypt));
        let greece = path.draw_glyph(2, &mut rng);
        assert!(WORLDS[2].glyphs.contains(&greece));
    }

    #[test]
    fn theme_display() {
        assert_eq!(Theme::Royal.to_string(), "royal");
        assert_eq!(format!("{:8}", Theme::Ocean), "ocean   ");
    }
}
