//! Parsed license expressions and deterministic simplification.
//!
//! The `spdx` crate handles strict parsing and identifier validation; its
//! postfix node stream is rebuilt into a tree here so the expression can
//! be simplified and rendered in ebuild syntax. Simplification is limited
//! to flattening, sorted deduplication, singleton collapse and AND/OR
//! absorption, which makes the result independent of input order without
//! inventing deeper equivalences.

use std::collections::BTreeSet;

use spdx::expression::{ExprNode, Operator};

use crate::license::LicenseError;

/// A boolean expression over license requirements.
///
/// Leaves hold the SPDX requirement as rendered by the parser (including
/// any `WITH` exception), e.g. `"Apache-2.0 WITH LLVM-exception"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LicenseExpr {
    License(String),
    And(Vec<LicenseExpr>),
    Or(Vec<LicenseExpr>),
}

impl LicenseExpr {
    /// Parse an SPDX expression strictly. Unparsable input is an error.
    pub fn parse(expression: &str) -> Result<LicenseExpr, LicenseError> {
        let parsed = spdx::Expression::parse(expression).map_err(|e| LicenseError::Parse {
            expression: expression.to_string(),
            reason: e.reason.to_string(),
        })?;

        let mut stack: Vec<LicenseExpr> = Vec::new();
        for node in parsed.iter() {
            match node {
                ExprNode::Req(req) => stack.push(LicenseExpr::License(req.req.to_string())),
                ExprNode::Op(op) => {
                    let (Some(right), Some(left)) = (stack.pop(), stack.pop()) else {
                        return Err(LicenseError::Parse {
                            expression: expression.to_string(),
                            reason: "unbalanced expression".to_string(),
                        });
                    };
                    stack.push(match op {
                        Operator::And => LicenseExpr::And(vec![left, right]),
                        Operator::Or => LicenseExpr::Or(vec![left, right]),
                    });
                }
            }
        }
        stack.pop().ok_or_else(|| LicenseError::Parse {
            expression: expression.to_string(),
            reason: "empty expression".to_string(),
        })
    }

    /// Simplify the expression deterministically.
    pub fn simplify(self) -> LicenseExpr {
        match self {
            LicenseExpr::License(_) => self,
            LicenseExpr::And(children) => simplify_node(children, true),
            LicenseExpr::Or(children) => simplify_node(children, false),
        }
    }
}

fn simplify_node(children: Vec<LicenseExpr>, is_and: bool) -> LicenseExpr {
    // Flatten nested nodes of the same operator into one sorted set.
    let mut operands = BTreeSet::new();
    for child in children {
        match (is_and, child.simplify()) {
            (true, LicenseExpr::And(inner)) => operands.extend(inner),
            (false, LicenseExpr::Or(inner)) => operands.extend(inner),
            (_, other) => {
                operands.insert(other);
            }
        }
    }

    // Absorption: X AND (X OR Y) = X, and X OR (X AND Y) = X.
    let mut kept: Vec<LicenseExpr> = operands
        .iter()
        .filter(|child| {
            let inner = match (is_and, *child) {
                (true, LicenseExpr::Or(inner)) => inner,
                (false, LicenseExpr::And(inner)) => inner,
                _ => return true,
            };
            !inner.iter().any(|member| operands.contains(member))
        })
        .cloned()
        .collect();

    if kept.len() == 1 {
        kept.swap_remove(0)
    } else if is_and {
        LicenseExpr::And(kept)
    } else {
        LicenseExpr::Or(kept)
    }
}
