use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

/// Methylation pattern of a single read over three adjacent CpG sites.
///
/// Digits read left to right correspond to CpG1, CpG2 and CpG3; `1` marks a
/// methylated site.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum PmpPattern {
    P000,
    P001,
    P010,
    P011,
    P100,
    P101,
    P110,
    P111,
}

impl PmpPattern {
    /// All patterns in column order of a PMP table.
    pub const ALL: [PmpPattern; 8] = [
        PmpPattern::P000,
        PmpPattern::P001,
        PmpPattern::P010,
        PmpPattern::P011,
        PmpPattern::P100,
        PmpPattern::P101,
        PmpPattern::P110,
        PmpPattern::P111,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PmpPattern::P000 => "000",
            PmpPattern::P001 => "001",
            PmpPattern::P010 => "010",
            PmpPattern::P011 => "011",
            PmpPattern::P100 => "100",
            PmpPattern::P101 => "101",
            PmpPattern::P110 => "110",
            PmpPattern::P111 => "111",
        }
    }

    /// Position of the pattern in [`PmpPattern::ALL`].
    pub fn index(&self) -> usize { *self as usize }

    /// Methylation state of each of the three CpG sites.
    pub fn bits(&self) -> [bool; 3] {
        let idx = self.index();
        [idx & 0b100 != 0, idx & 0b010 != 0, idx & 0b001 != 0]
    }

    /// Contribution of one read with this pattern to the coverage of CpG1,
    /// CpG2 and CpG3.
    ///
    /// This is the mask table used by the coverage summary: all-unmethylated
    /// reads count towards every site, every other pattern counts only
    /// towards its methylated sites.
    pub fn coverage_mask(&self) -> [u32; 3] {
        match self {
            PmpPattern::P000 => [1, 1, 1],
            other => {
                let [a, b, c] = other.bits();
                [a as u32, b as u32, c as u32]
            },
        }
    }
}

impl Display for PmpPattern {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PmpPattern {
    type Err = anyhow::Error;

    /// Accepts both the bare (`010`) and the backtick-quoted (`` `010``)
    /// spelling used in PMP table headers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('`');
        PmpPattern::ALL
            .iter()
            .find(|p| p.as_str() == trimmed)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown methylation pattern '{}'", s))
    }
}

impl Serialize for PmpPattern {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PmpPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
