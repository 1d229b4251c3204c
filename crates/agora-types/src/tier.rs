use serde::{Deserialize, Serialize};

/// Discrete reputation bracket, a pure function of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    /// Map an overall score to its tier.
    ///
    /// Thresholds: `<60` bronze, `60..=69` silver, `70..=79` gold,
    /// `80..=89` platinum, `>=90` diamond.
    pub fn for_score(score: f64) -> Self {
        if score >= 90.0 {
            Tier::Diamond
        } else if score >= 80.0 {
            Tier::Platinum
        } else if score >= 70.0 {
            Tier::Gold
        } else if score >= 60.0 {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Bronze => write!(f, "bronze"),
            Tier::Silver => write!(f, "silver"),
            Tier::Gold => write!(f, "gold"),
            Tier::Platinum => write!(f, "platinum"),
            Tier::Diamond => write!(f, "diamond"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "platinum" => Ok(Tier::Platinum),
            "diamond" => Ok(Tier::Diamond),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}
