// TuskTsk - Configuration Language Toolkit
//
// Copyright (c) 2025 TuskTsk authors and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Void traversal over a configuration.
//!
//! [`walk`] handles the recursive structure so analyses only override the
//! callbacks they care about. Callbacks are pre-order; `leave_expression`
//! fires after an expression's children.
//!
//! # Example
//!
//! ```
//! use tusk_core::ast::{walk, AssignmentNode, Configuration, Expression, NodeCounter, Statement};
//!
//! let config = Configuration::new(vec![Statement::Assignment(AssignmentNode {
//!     key: "port".to_string(),
//!     value: Expression::string("8080", 1),
//!     line: 1,
//! })]);
//!
//! let mut counter = NodeCounter::default();
//! walk(&config, &mut counter);
//! assert_eq!(counter.statement_count, 1);
//! assert_eq!(counter.expression_count, 1);
//! ```

use std::collections::BTreeMap;

use super::nodes::*;

/// Position of the current node during a walk.
#[derive(Debug, Clone, Default)]
pub struct WalkContext<'a> {
    /// Nesting depth (0 = statement level).
    pub depth: usize,
    /// Keys from the root to the current node.
    pub path: Vec<&'a str>,
}

impl<'a> WalkContext<'a> {
    /// Context for the statement level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Child context one level deeper, optionally entering a named key.
    pub fn child(&self, key: Option<&'a str>) -> Self {
        let mut path = self.path.clone();
        if let Some(key) = key {
            path.push(key);
        }
        Self {
            depth: self.depth + 1,
            path,
        }
    }

    /// Current path as a dot-joined string (for error messages).
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path.join(".")
        }
    }
}

/// Callbacks for visiting a configuration without producing values.
///
/// All methods default to doing nothing.
pub trait NodeVisitor {
    /// Called before any statement.
    fn enter_configuration(&mut self, _config: &Configuration) {}

    /// Called after every statement.
    fn leave_configuration(&mut self, _config: &Configuration) {}

    /// Called for each statement before its expressions.
    fn visit_statement(&mut self, _stmt: &Statement, _ctx: &WalkContext) {}

    /// Called for each expression before its children.
    fn visit_expression(&mut self, _expr: &Expression, _ctx: &WalkContext) {}

    /// Called for each expression after its children.
    fn leave_expression(&mut self, _expr: &Expression, _ctx: &WalkContext) {}
}

/// Walk every statement and expression of `config` in source order.
pub fn walk<V: NodeVisitor + ?Sized>(config: &Configuration, visitor: &mut V) {
    let ctx = WalkContext::new();
    visitor.enter_configuration(config);

    for stmt in &config.statements {
        walk_statement(stmt, visitor, &ctx);
    }

    visitor.leave_configuration(config);
}

fn walk_statement<'a, V: NodeVisitor + ?Sized>(stmt: &'a Statement, visitor: &mut V, ctx: &WalkContext<'a>) {
    visitor.visit_statement(stmt, ctx);

    match stmt {
        Statement::Comment(_) | Statement::Section(_) => {}
        Statement::GlobalVariable(n) => walk_expression(&n.value, visitor, &ctx.child(Some(n.name.as_str()))),
        Statement::Assignment(n) => walk_expression(&n.value, visitor, &ctx.child(Some(n.key.as_str()))),
        Statement::Include(n) => walk_expression(&n.path, visitor, &ctx.child(None)),
    }
}

fn walk_expression<'a, V: NodeVisitor + ?Sized>(expr: &'a Expression, visitor: &mut V, ctx: &WalkContext<'a>) {
    visitor.visit_expression(expr, ctx);

    let child = ctx.child(None);
    match expr {
        Expression::Literal(_) | Expression::String(_) | Expression::Variable(_) => {}
        Expression::Binary(n) => {
            walk_expression(&n.left, visitor, &child);
            walk_expression(&n.right, visitor, &child);
        }
        Expression::Unary(n) => walk_expression(&n.operand, visitor, &child),
        Expression::Ternary(n) => {
            walk_expression(&n.condition, visitor, &child);
            walk_expression(&n.then_branch, visitor, &child);
            walk_expression(&n.else_branch, visitor, &child);
        }
        Expression::Range(n) => {
            walk_expression(&n.start, visitor, &child);
            walk_expression(&n.end, visitor, &child);
        }
        Expression::Array(n) => walk_all(&n.elements, visitor, &child),
        Expression::Object(n) => walk_entries(&n.entries, visitor, ctx),
        Expression::NamedObject(n) => walk_entries(&n.entries, visitor, &ctx.child(Some(n.name.as_str()))),
        Expression::AtOperator(n) => walk_all(&n.args, visitor, &child),
        Expression::CrossFile(n) => walk_all(&n.args, visitor, &child),
        Expression::PropertyAccess(n) => walk_expression(&n.object, visitor, &child),
        Expression::MethodCall(n) => {
            walk_expression(&n.object, visitor, &child);
            walk_all(&n.args, visitor, &child);
        }
        Expression::IndexAccess(n) => {
            walk_expression(&n.object, visitor, &child);
            walk_expression(&n.index, visitor, &child);
        }
        Expression::Grouping(n) => walk_expression(&n.inner, visitor, &child),
    }

    visitor.leave_expression(expr, ctx);
}

fn walk_all<'a, V: NodeVisitor + ?Sized>(exprs: &'a [Expression], visitor: &mut V, ctx: &WalkContext<'a>) {
    for expr in exprs {
        walk_expression(expr, visitor, ctx);
    }
}

fn walk_entries<'a, V: NodeVisitor + ?Sized>(entries: &'a ObjectEntries, visitor: &mut V, ctx: &WalkContext<'a>) {
    for (key, value) in entries {
        walk_expression(value, visitor, &ctx.child(Some(key.as_str())));
    }
}

/// Counts statements and expressions by kind.
#[derive(Debug, Default)]
pub struct NodeCounter {
    /// Number of statements visited.
    pub statement_count: usize,
    /// Number of expressions visited.
    pub expression_count: usize,
    /// Visits per node kind name.
    pub by_kind: BTreeMap<&'static str, usize>,
    /// Maximum depth reached.
    pub max_depth: usize,
}

impl NodeCounter {
    /// Count for one kind name, zero if never seen.
    pub fn count(&self, kind: &str) -> usize {
        self.by_kind.get(kind).copied().unwrap_or(0)
    }
}

impl NodeVisitor for NodeCounter {
    fn visit_statement(&mut self, stmt: &Statement, ctx: &WalkContext) {
        self.statement_count += 1;
        *self.by_kind.entry(stmt.kind_name()).or_insert(0) += 1;
        self.max_depth = self.max_depth.max(ctx.depth);
    }

    fn visit_expression(&mut self, expr: &Expression, ctx: &WalkContext) {
        self.expression_count += 1;
        *self.by_kind.entry(expr.kind_name()).or_insert(0) += 1;
        self.max_depth = self.max_depth.max(ctx.depth);
    }
}
