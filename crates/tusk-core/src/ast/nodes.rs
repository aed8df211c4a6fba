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

//! AST node types.
//!
//! Nodes are plain data. They carry the 1-based source line they started on
//! and nothing else; all behavior lives in visitors.

use indexmap::IndexMap;

use crate::lex::Literal;

/// Ordered key to expression map used by object literals.
pub type ObjectEntries = IndexMap<String, Expression>;

/// Parse root: the ordered statements of one source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub statements: Vec<Statement>,
    pub line: usize,
}

impl Configuration {
    /// Create a configuration starting at line 1.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements, line: 1 }
    }

    /// Returns true if the configuration has no statements.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

// ==================== Statements ====================

/// A top-level or nested declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Comment(CommentNode),
    Section(SectionNode),
    GlobalVariable(GlobalVariableNode),
    Assignment(AssignmentNode),
    Include(IncludeNode),
}

impl Statement {
    /// Source line the statement starts on.
    pub fn line(&self) -> usize {
        match self {
            Statement::Comment(n) => n.line,
            Statement::Section(n) => n.line,
            Statement::GlobalVariable(n) => n.line,
            Statement::Assignment(n) => n.line,
            Statement::Include(n) => n.line,
        }
    }

    /// Short name of the variant, for diagnostics and statistics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Comment(_) => "comment",
            Statement::Section(_) => "section",
            Statement::GlobalVariable(_) => "global_variable",
            Statement::Assignment(_) => "assignment",
            Statement::Include(_) => "include",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentNode {
    pub text: String,
    pub line: usize,
}

/// `[name]` scope marker. Following assignments belong to it; the node
/// itself holds no children.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionNode {
    pub name: String,
    pub line: usize,
}

/// `$name: value`
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalVariableNode {
    pub name: String,
    pub value: Expression,
    pub line: usize,
}

/// `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNode {
    pub key: String,
    pub value: Expression,
    pub line: usize,
}

/// `include path` or `import path`.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    pub path: Expression,
    pub is_import: bool,
    pub line: usize,
}

// ==================== Expressions ====================

/// Anything that produces a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(LiteralNode),
    String(StringNode),
    Variable(VariableNode),
    Binary(BinaryNode),
    Unary(UnaryNode),
    Ternary(TernaryNode),
    Range(RangeNode),
    Array(ArrayNode),
    Object(ObjectNode),
    NamedObject(NamedObjectNode),
    AtOperator(AtOperatorNode),
    CrossFile(CrossFileNode),
    PropertyAccess(PropertyAccessNode),
    MethodCall(MethodCallNode),
    IndexAccess(IndexAccessNode),
    Grouping(GroupingNode),
}

impl Expression {
    /// Already-typed scalar.
    pub fn literal(value: Literal, line: usize) -> Self {
        Expression::Literal(LiteralNode { value, line })
    }

    /// Plain (non-template) string.
    pub fn string(value: impl Into<String>, line: usize) -> Self {
        Expression::String(StringNode {
            value: value.into(),
            is_template: false,
            line,
        })
    }

    /// Local variable reference.
    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        Expression::Variable(VariableNode {
            name: name.into(),
            is_global: false,
            line,
        })
    }

    /// Binary operation.
    pub fn binary(left: Expression, operator: impl Into<String>, right: Expression, line: usize) -> Self {
        Expression::Binary(BinaryNode {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
            line,
        })
    }

    /// Source line the expression starts on.
    pub fn line(&self) -> usize {
        match self {
            Expression::Literal(n) => n.line,
            Expression::String(n) => n.line,
            Expression::Variable(n) => n.line,
            Expression::Binary(n) => n.line,
            Expression::Unary(n) => n.line,
            Expression::Ternary(n) => n.line,
            Expression::Range(n) => n.line,
            Expression::Array(n) => n.line,
            Expression::Object(n) => n.line,
            Expression::NamedObject(n) => n.line,
            Expression::AtOperator(n) => n.line,
            Expression::CrossFile(n) => n.line,
            Expression::PropertyAccess(n) => n.line,
            Expression::MethodCall(n) => n.line,
            Expression::IndexAccess(n) => n.line,
            Expression::Grouping(n) => n.line,
        }
    }

    /// Short name of the variant, for diagnostics and statistics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::String(_) => "string",
            Expression::Variable(_) => "variable",
            Expression::Binary(_) => "binary",
            Expression::Unary(_) => "unary",
            Expression::Ternary(_) => "ternary",
            Expression::Range(_) => "range",
            Expression::Array(_) => "array",
            Expression::Object(_) => "object",
            Expression::NamedObject(_) => "named_object",
            Expression::AtOperator(_) => "at_operator",
            Expression::CrossFile(_) => "cross_file",
            Expression::PropertyAccess(_) => "property_access",
            Expression::MethodCall(_) => "method_call",
            Expression::IndexAccess(_) => "index_access",
            Expression::Grouping(_) => "grouping",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralNode {
    pub value: Literal,
    pub line: usize,
}

/// String value. Template strings are subject to later interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct StringNode {
    pub value: String,
    pub is_template: bool,
    pub line: usize,
}

/// `name` or `$name`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    pub name: String,
    pub is_global: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryNode {
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryNode {
    pub operator: String,
    pub operand: Box<Expression>,
    pub line: usize,
}

/// `condition ? then_branch : else_branch`
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryNode {
    pub condition: Box<Expression>,
    pub then_branch: Box<Expression>,
    pub else_branch: Box<Expression>,
    pub line: usize,
}

/// Inclusive range over integers or dates.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    pub start: Box<Expression>,
    pub end: Box<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub elements: Vec<Expression>,
    pub line: usize,
}

/// `{ key: value, ... }`. Keys keep source order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub entries: ObjectEntries,
    pub line: usize,
}

/// `name > ... <`. Same map as [`ObjectNode`] with a leading identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedObjectNode {
    pub name: String,
    pub entries: ObjectEntries,
    pub line: usize,
}

/// `@name(args)`: extension point for side-effecting builtins such as
/// `@env`, `@date` or `@query`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtOperatorNode {
    pub name: String,
    pub args: Vec<Expression>,
    pub line: usize,
}

/// `@file.tsk.method(args)`: reads from another configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossFileNode {
    pub file: String,
    pub method: String,
    pub args: Vec<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAccessNode {
    pub object: Box<Expression>,
    pub property: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallNode {
    pub object: Box<Expression>,
    pub method: String,
    pub args: Vec<Expression>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccessNode {
    pub object: Box<Expression>,
    pub index: Box<Expression>,
    pub line: usize,
}

/// Parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingNode {
    pub inner: Box<Expression>,
    pub line: usize,
}
