use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    GitHub,
    Codeforces,
    Codechef,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::LeetCode,
        Platform::GitHub,
        Platform::Codeforces,
        Platform::Codechef,
    ];

    /// Lowercase route segment, e.g. `/leetcode/:username`.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::LeetCode => "leetcode",
            Platform::GitHub => "github",
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::LeetCode => write!(f, "LeetCode"),
            Platform::GitHub => write!(f, "GitHub"),
            Platform::Codeforces => write!(f, "Codeforces"),
            Platform::Codechef => write!(f, "CodeChef"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leetcode" | "lc" => Ok(Platform::LeetCode),
            "github" | "gh" => Ok(Platform::GitHub),
            "codeforces" | "cf" => Ok(Platform::Codeforces),
            "codechef" | "cc" => Ok(Platform::Codechef),
            other => Err(format!(
                "unknown platform '{}' (expected leetcode, github, codeforces or codechef)",
                other
            )),
        }
    }
}
