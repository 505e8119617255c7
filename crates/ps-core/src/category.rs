//! Agent categories and the pursuit dispatch table.
//!
//! Behaviour differences between categories live in one table,
//! [`PURSUIT_TABLE`], indexed by [`Category::index`].  Each row names the
//! category an agent reacts to and whether it moves toward or away from it.
//! Adding a category means adding a variant and a row, not another branch
//! in the motion code.

use std::fmt;
use std::str::FromStr;

use crate::PsError;

/// The role an agent plays in the pursuit.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// Prey: flees its nearest Hunter.
    Runner,
    /// Predator: chases its nearest Runner.
    Hunter,
}

/// Direction of the pursuit force relative to the target.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Heading {
    /// Move directly away from the target.
    Flee,
    /// Move directly toward the target.
    Chase,
}

impl Heading {
    /// Multiplier applied to the `self - target` unit vector.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Heading::Flee  => 1.0,
            Heading::Chase => -1.0,
        }
    }
}

/// One row of the dispatch table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PursuitRule {
    /// Category whose nearest member drives this agent's motion.
    pub target:  Category,
    pub heading: Heading,
}

/// `category → (target-selection rule, force sign)`, indexed by
/// [`Category::index`].
pub const PURSUIT_TABLE: [PursuitRule; Category::COUNT] = [
    // Runner
    PursuitRule { target: Category::Hunter, heading: Heading::Flee },
    // Hunter
    PursuitRule { target: Category::Runner, heading: Heading::Chase },
];

impl Category {
    pub const COUNT: usize = 2;

    /// All categories in table order.
    pub const ALL: [Category; Category::COUNT] = [Category::Runner, Category::Hunter];

    /// Row of this category in [`PURSUIT_TABLE`] and other per-category arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::Runner => 0,
            Category::Hunter => 1,
        }
    }

    #[inline]
    pub fn rule(self) -> PursuitRule {
        PURSUIT_TABLE[self.index()]
    }

    /// The category this one pursues or evades.
    #[inline]
    pub fn opponent(self) -> Category {
        self.rule().target
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Runner => "runner",
            Category::Hunter => "hunter",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = PsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runner" => Ok(Category::Runner),
            "hunter" => Ok(Category::Hunter),
            other    => Err(PsError::Parse(format!("unknown category {other:?}"))),
        }
    }
}
