//! Field-condition operators

use std::fmt;
use std::str::FromStr;

/// Comparison operators usable inside a field condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    In,
    Like,
}

impl Operator {
    /// The operator's key as written in a query
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Gt => "$gt",
            Operator::Lt => "$lt",
            Operator::In => "$in",
            Operator::Like => "$like",
        }
    }
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$eq" => Ok(Operator::Eq),
            "$gt" => Ok(Operator::Gt),
            "$lt" => Ok(Operator::Lt),
            "$in" => Ok(Operator::In),
            "$like" => Ok(Operator::Like),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
