//! Cube faces and their canonical ordering.

use std::fmt;
use std::str::FromStr;

/// One of the six orientations of a cube map, as seen from the sphere's center
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Face {
    Up,
    Down,
    Front,
    Right,
    Back,
    Left,
}

impl Face {
    /// All faces in canonical order
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
    ];

    /// Lowercase name, also used as the output file stem
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Face::Up => "up",
            Face::Down => "down",
            Face::Front => "front",
            Face::Right => "right",
            Face::Back => "back",
            Face::Left => "left",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Face {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Face::ALL
            .into_iter()
            .find(|face| face.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown cube face '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for face in Face::ALL {
            assert_eq!(face.name().parse::<Face>(), Ok(face));
        }
        assert_eq!("FRONT".parse::<Face>(), Ok(Face::Front));
        assert!("top".parse::<Face>().is_err());
    }

    #[test]
    fn test_canonical_order() {
        let names: Vec<_> = Face::ALL.iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["up", "down", "front", "right", "back", "left"]);
    }
}
