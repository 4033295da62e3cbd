// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use vigil_core::LogicalOp;

use crate::ast::{Condition, Expr};

/// Polymorphic dispatch over the two expression node shapes.
///
/// Implementors produce one `Output` per node; recursion into binary
/// children is the visitor's own responsibility (via [`Expr::accept`]),
/// which lets analyses fold child results however they need.
pub trait ExprVisitor {
    /// Result produced per node.
    type Output;

    /// Visit a condition leaf.
    fn visit_condition(&mut self, condition: &Condition) -> Self::Output;

    /// Visit a binary AND/OR node.
    fn visit_binary(
        &mut self,
        name: &Arc<str>,
        op: LogicalOp,
        left: &Expr,
        right: &Expr,
    ) -> Self::Output;
}
