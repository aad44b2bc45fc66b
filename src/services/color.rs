//! Color compatibility rules used by outfit scoring.
//!
//! Every function expects lower-cased color names.

/// Colors treated as a safe background for any outfit
pub const NEUTRALS: [&str; 12] = [
    "black", "white", "gray", "grey", "navy", "tan", "beige", "olive", "khaki", "denim", "cream",
    "brown",
];

/// Hue family a color name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    Blue,
    Orange,
    Red,
    Green,
    Yellow,
    Purple,
}

/// Near-synonymous hues grouped per family
const FAMILY_BUCKETS: [(ColorFamily, &[&str]); 6] = [
    (
        ColorFamily::Blue,
        &["blue", "lightblue", "navy", "teal", "turquoise", "cyan"],
    ),
    (ColorFamily::Orange, &["orange", "rust", "coral", "amber"]),
    (ColorFamily::Red, &["red", "maroon", "burgundy", "pink"]),
    (ColorFamily::Green, &["green", "olive", "forest"]),
    (ColorFamily::Yellow, &["yellow", "mustard", "gold"]),
    (ColorFamily::Purple, &["purple", "violet", "lilac", "magenta"]),
];

const COMPLEMENTARY_PAIRS: [(ColorFamily, ColorFamily); 3] = [
    (ColorFamily::Blue, ColorFamily::Orange),
    (ColorFamily::Red, ColorFamily::Green),
    (ColorFamily::Yellow, ColorFamily::Purple),
];

pub fn is_neutral(color: &str) -> bool {
    NEUTRALS.contains(&color)
}

/// Family bucket of a color, if it belongs to one
pub fn family_of(color: &str) -> Option<ColorFamily> {
    FAMILY_BUCKETS
        .iter()
        .find(|(_, members)| members.contains(&color))
        .map(|(family, _)| *family)
}

fn family_present<S: AsRef<str>>(colors: &[S], family: ColorFamily) -> bool {
    colors.iter().any(|c| family_of(c.as_ref()) == Some(family))
}

/// True when both halves of any complementary pair appear among `colors`.
/// Neutrals count too: navy sits in the blue bucket.
pub fn has_complementary_pair<S: AsRef<str>>(colors: &[S]) -> bool {
    COMPLEMENTARY_PAIRS
        .iter()
        .any(|&(a, b)| family_present(colors, a) && family_present(colors, b))
}

/// True when every non-neutral color falls in one family bucket.
///
/// Trivially true with at most one non-neutral color. Accents outside
/// every bucket don't count as a family, so a lone unbucketed accent pair
/// is not monochrome.
pub fn same_family<S: AsRef<str>>(colors: &[S]) -> bool {
    let accents: Vec<&str> = colors
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !is_neutral(c))
        .collect();

    if accents.len() <= 1 {
        return true;
    }

    let families = FAMILY_BUCKETS
        .iter()
        .filter(|(_, members)| accents.iter().any(|c| members.contains(c)))
        .count();

    families == 1
}

/// Companion neutrals that usually work with already-extracted colors
const PALETTE_COMPANIONS: [(&str, [&str; 3]); 4] = [
    ("blue", ["white", "gray", "beige"]),
    ("black", ["white", "gray", "cream"]),
    ("navy", ["white", "khaki", "brown"]),
    ("brown", ["cream", "beige", "white"]),
];

const PALETTE_SIZE: usize = 5;

/// Suggests a tagging palette: the given colors followed by their usual
/// companions, de-duplicated and capped at five entries.
pub fn suggested_palette<S: AsRef<str>>(extracted: &[S]) -> Vec<String> {
    let extracted: Vec<String> = extracted
        .iter()
        .map(|c| c.as_ref().trim().to_lowercase())
        .collect();

    let companions = PALETTE_COMPANIONS
        .iter()
        .filter(|(base, _)| extracted.iter().any(|c| c == base))
        .flat_map(|(_, companions)| companions.iter().map(|c| c.to_string()));

    let mut palette: Vec<String> = Vec::with_capacity(PALETTE_SIZE);
    for color in extracted.iter().cloned().chain(companions) {
        if palette.len() == PALETTE_SIZE {
            break;
        }
        if !palette.contains(&color) {
            palette.push(color);
        }
    }
    palette
}
