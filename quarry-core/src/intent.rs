//! Query intent: a closed six-variant classification of what the user
//! is trying to do. Derived once per query; drives enhancement and
//! ranking-weight selection.

use serde::{Deserialize, Serialize};

/// Coarse user goal behind a query.
///
/// Classification priority (first match wins) is
/// `Debug > Test > Refactor > Document > Implement > Understand`,
/// with `Understand` as the default when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Implement,
    Debug,
    Understand,
    Refactor,
    Test,
    Document,
}

impl Intent {
    /// All intents, in declaration order.
    pub const ALL: [Intent; 6] = [
        Intent::Implement,
        Intent::Debug,
        Intent::Understand,
        Intent::Refactor,
        Intent::Test,
        Intent::Document,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Implement => "implement",
            Intent::Debug => "debug",
            Intent::Understand => "understand",
            Intent::Refactor => "refactor",
            Intent::Test => "test",
            Intent::Document => "document",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
