use serde::{Deserialize, Serialize};

use crate::*;

pub const CUSTOM_WIDTH_RANGE: (Coord, Coord) = (5, 60);
pub const CUSTOM_HEIGHT_RANGE: (Coord, Coord) = (5, 40);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn spec(self) -> BoardSpec {
        match self {
            Self::Beginner => BoardSpec::new(9, 9, 10),
            Self::Intermediate => BoardSpec::new(16, 16, 40),
            Self::Expert => BoardSpec::new(30, 16, 99),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }

    /// Preset with exactly this shape and mine count, if any.
    pub fn from_spec(spec: &BoardSpec) -> Option<Self> {
        Self::ALL.into_iter().find(|difficulty| difficulty.spec() == *spec)
    }
}

/// Validates a user-entered board, which is held to tighter bounds than [`BoardSpec::validate`].
pub fn validate_custom_spec(
    width: Coord,
    height: Coord,
    mine_count: CellCount,
) -> Result<BoardSpec> {
    let (min_width, max_width) = CUSTOM_WIDTH_RANGE;
    if !(min_width..=max_width).contains(&width) {
        return Err(SpecError::WidthOutOfRange {
            min: min_width,
            max: max_width,
        }
        .into());
    }

    let (min_height, max_height) = CUSTOM_HEIGHT_RANGE;
    if !(min_height..=max_height).contains(&height) {
        return Err(SpecError::HeightOutOfRange {
            min: min_height,
            max: max_height,
        }
        .into());
    }

    BoardSpec::new(width, height, mine_count).validated()
}
