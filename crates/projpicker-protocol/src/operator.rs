//! Logical operators combining the per-geometry CRS matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How results for several drawn geometries are combined on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// Intersection: CRSs matching every geometry
    #[default]
    And,
    /// Union: CRSs matching any geometry
    Or,
    /// Symmetric difference: CRSs matching exactly one geometry
    Xor,
}

impl LogicalOperator {
    /// Every operator, in the order the selection control lists them.
    pub const ALL: [LogicalOperator; 3] = [
        LogicalOperator::And,
        LogicalOperator::Or,
        LogicalOperator::Xor,
    ];

    /// Keyword used on the wire.
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
            LogicalOperator::Xor => "xor",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for LogicalOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(LogicalOperator::And),
            "or" => Ok(LogicalOperator::Or),
            "xor" => Ok(LogicalOperator::Xor),
            other => Err(format!(
                "unknown logical operator '{}', expected one of: and, or, xor",
                other
            )),
        }
    }
}
