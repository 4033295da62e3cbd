// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The arithmetic sub-language for dynamic thresholds.
//!
//! Constants, variables, and `+ - * /` with standard precedence. Trees are
//! immutable and owned by their condition; evaluation reads the resolver and
//! fails on unknown variables and division by zero rather than producing a
//! silent default.

use std::collections::BTreeSet;
use std::fmt;

use vigil_core::{Result, VigilError};

use crate::resolver::VariableResolver;

/// Binary operator of the arithmetic sub-language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// Operator spelling in rule text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Precedence level: multiplicative above additive.
    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An arithmetic term: constant, variable, or binary operation.
#[derive(Clone, Debug, PartialEq)]
pub enum ArithExpr {
    /// A numeric literal
    Constant(f64),
    /// A named variable, resolved at evaluation time
    Variable(String),
    /// A binary operation over two sub-terms
    Binary {
        op: ArithOp,
        left: Box<ArithExpr>,
        right: Box<ArithExpr>,
    },
}

impl ArithExpr {
    /// A constant term.
    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// A variable term.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// A binary term.
    #[must_use]
    pub fn binary(op: ArithOp, left: ArithExpr, right: ArithExpr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Evaluate against the given resolver.
    ///
    /// # Errors
    ///
    /// `UnresolvedVariable` when a variable is not defined by the resolver;
    /// `DivisionByZero` when a divisor evaluates to zero.
    pub fn evaluate(&self, resolver: &dyn VariableResolver) -> Result<f64> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Variable(name) => {
                resolver
                    .resolve(name)
                    .ok_or_else(|| VigilError::UnresolvedVariable {
                        name: name.clone(),
                    })
            }
            Self::Binary { op, left, right } => {
                let lhs = left.evaluate(resolver)?;
                let rhs = right.evaluate(resolver)?;
                match op {
                    ArithOp::Add => Ok(lhs + rhs),
                    ArithOp::Sub => Ok(lhs - rhs),
                    ArithOp::Mul => Ok(lhs * rhs),
                    ArithOp::Div => {
                        if rhs == 0.0 {
                            Err(VigilError::DivisionByZero)
                        } else {
                            Ok(lhs / rhs)
                        }
                    }
                }
            }
        }
    }

    /// The set of variable names referenced anywhere in this tree.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Constant(_) => {}
            Self::Variable(name) => {
                names.insert(name.clone());
            }
            Self::Binary { left, right, .. } => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
        }
    }

    /// The literal value, when this tree is a single constant.
    #[must_use]
    pub const fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether any constant in the tree is NaN or infinite.
    #[must_use]
    pub fn has_non_finite_constant(&self) -> bool {
        match self {
            Self::Constant(value) => !value.is_finite(),
            Self::Variable(_) => false,
            Self::Binary { left, right, .. } => {
                left.has_non_finite_constant() || right.has_non_finite_constant()
            }
        }
    }

    /// Height of the tree; leaves have depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Constant(_) | Self::Variable(_) => 1,
            Self::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parent: ArithOp, is_right: bool) -> fmt::Result {
        // Parenthesize when the child binds looser than the parent, or when
        // a right-hand child binds equally (all operators are left
        // associative, so `a - (b - c)` must keep its parentheses).
        let needs_parens = match self {
            Self::Binary { op, .. } => {
                op.precedence() < parent.precedence()
                    || (is_right && op.precedence() == parent.precedence())
            }
            _ => false,
        };

        if needs_parens {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for ArithExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{value}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Binary { op, left, right } => {
                left.fmt_child(f, *op, false)?;
                write!(f, " {op} ")?;
                right.fmt_child(f, *op, true)
            }
        }
    }
}
