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

//! Typed double dispatch over the node set.
//!
//! Each node type has an `accept` method that calls back into the matching
//! `visit_*` method of a [`Visitor`]. Adding a node type means adding one
//! method here and implementing it in every visitor; adding an operation
//! means writing a new visitor and touching no node.

use super::nodes::*;

/// An operation over the AST producing `Output` for each node.
pub trait Visitor {
    /// Value produced for each visited node.
    type Output;

    fn visit_configuration(&mut self, node: &Configuration) -> Self::Output;

    fn visit_comment(&mut self, node: &CommentNode) -> Self::Output;
    fn visit_section(&mut self, node: &SectionNode) -> Self::Output;
    fn visit_global_variable(&mut self, node: &GlobalVariableNode) -> Self::Output;
    fn visit_assignment(&mut self, node: &AssignmentNode) -> Self::Output;
    fn visit_include(&mut self, node: &IncludeNode) -> Self::Output;

    fn visit_literal(&mut self, node: &LiteralNode) -> Self::Output;
    fn visit_string(&mut self, node: &StringNode) -> Self::Output;
    fn visit_variable(&mut self, node: &VariableNode) -> Self::Output;
    fn visit_binary(&mut self, node: &BinaryNode) -> Self::Output;
    fn visit_unary(&mut self, node: &UnaryNode) -> Self::Output;
    fn visit_ternary(&mut self, node: &TernaryNode) -> Self::Output;
    fn visit_range(&mut self, node: &RangeNode) -> Self::Output;
    fn visit_array(&mut self, node: &ArrayNode) -> Self::Output;
    fn visit_object(&mut self, node: &ObjectNode) -> Self::Output;
    fn visit_named_object(&mut self, node: &NamedObjectNode) -> Self::Output;
    fn visit_at_operator(&mut self, node: &AtOperatorNode) -> Self::Output;
    fn visit_cross_file(&mut self, node: &CrossFileNode) -> Self::Output;
    fn visit_property_access(&mut self, node: &PropertyAccessNode) -> Self::Output;
    fn visit_method_call(&mut self, node: &MethodCallNode) -> Self::Output;
    fn visit_index_access(&mut self, node: &IndexAccessNode) -> Self::Output;
    fn visit_grouping(&mut self, node: &GroupingNode) -> Self::Output;
}

macro_rules! impl_accept {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl $node {
                /// Dispatch to the matching visitor method.
                #[inline]
                pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

impl_accept! {
    Configuration => visit_configuration,
    CommentNode => visit_comment,
    SectionNode => visit_section,
    GlobalVariableNode => visit_global_variable,
    AssignmentNode => visit_assignment,
    IncludeNode => visit_include,
    LiteralNode => visit_literal,
    StringNode => visit_string,
    VariableNode => visit_variable,
    BinaryNode => visit_binary,
    UnaryNode => visit_unary,
    TernaryNode => visit_ternary,
    RangeNode => visit_range,
    ArrayNode => visit_array,
    ObjectNode => visit_object,
    NamedObjectNode => visit_named_object,
    AtOperatorNode => visit_at_operator,
    CrossFileNode => visit_cross_file,
    PropertyAccessNode => visit_property_access,
    MethodCallNode => visit_method_call,
    IndexAccessNode => visit_index_access,
    GroupingNode => visit_grouping,
}

impl Statement {
    /// Dispatch to the visitor method of the wrapped node.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Statement::Comment(n) => n.accept(visitor),
            Statement::Section(n) => n.accept(visitor),
            Statement::GlobalVariable(n) => n.accept(visitor),
            Statement::Assignment(n) => n.accept(visitor),
            Statement::Include(n) => n.accept(visitor),
        }
    }
}

impl Expression {
    /// Dispatch to the visitor method of the wrapped node.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Literal(n) => n.accept(visitor),
            Expression::String(n) => n.accept(visitor),
            Expression::Variable(n) => n.accept(visitor),
            Expression::Binary(n) => n.accept(visitor),
            Expression::Unary(n) => n.accept(visitor),
            Expression::Ternary(n) => n.accept(visitor),
            Expression::Range(n) => n.accept(visitor),
            Expression::Array(n) => n.accept(visitor),
            Expression::Object(n) => n.accept(visitor),
            Expression::NamedObject(n) => n.accept(visitor),
            Expression::AtOperator(n) => n.accept(visitor),
            Expression::CrossFile(n) => n.accept(visitor),
            Expression::PropertyAccess(n) => n.accept(visitor),
            Expression::MethodCall(n) => n.accept(visitor),
            Expression::IndexAccess(n) => n.accept(visitor),
            Expression::Grouping(n) => n.accept(visitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::Literal;

    /// Records the name of every node it is dispatched to, without recursing.
    struct Tagger;

    impl Visitor for Tagger {
        type Output = &'static str;

        fn visit_configuration(&mut self, _: &Configuration) -> &'static str {
            "configuration"
        }
        fn visit_comment(&mut self, _: &CommentNode) -> &'static str {
            "comment"
        }
        fn visit_section(&mut self, _: &SectionNode) -> &'static str {
            "section"
        }
        fn visit_global_variable(&mut self, _: &GlobalVariableNode) -> &'static str {
            "global_variable"
        }
        fn visit_assignment(&mut self, _: &AssignmentNode) -> &'static str {
            "assignment"
        }
        fn visit_include(&mut self, _: &IncludeNode) -> &'static str {
            "include"
        }
        fn visit_literal(&mut self, _: &LiteralNode) -> &'static str {
            "literal"
        }
        fn visit_string(&mut self, _: &StringNode) -> &'static str {
            "string"
        }
        fn visit_variable(&mut self, _: &VariableNode) -> &'static str {
            "variable"
        }
        fn visit_binary(&mut self, _: &BinaryNode) -> &'static str {
            "binary"
        }
        fn visit_unary(&mut self, _: &UnaryNode) -> &'static str {
            "unary"
        }
        fn visit_ternary(&mut self, _: &TernaryNode) -> &'static str {
            "ternary"
        }
        fn visit_range(&mut self, _: &RangeNode) -> &'static str {
            "range"
        }
        fn visit_array(&mut self, _: &ArrayNode) -> &'static str {
            "array"
        }
        fn visit_object(&mut self, _: &ObjectNode) -> &'static str {
            "object"
        }
        fn visit_named_object(&mut self, _: &NamedObjectNode) -> &'static str {
            "named_object"
        }
        fn visit_at_operator(&mut self, _: &AtOperatorNode) -> &'static str {
            "at_operator"
        }
        fn visit_cross_file(&mut self, _: &CrossFileNode) -> &'static str {
            "cross_file"
        }
        fn visit_property_access(&mut self, _: &PropertyAccessNode) -> &'static str {
            "property_access"
        }
        fn visit_method_call(&mut self, _: &MethodCallNode) -> &'static str {
            "method_call"
        }
        fn visit_index_access(&mut self, _: &IndexAccessNode) -> &'static str {
            "index_access"
        }
        fn visit_grouping(&mut self, _: &GroupingNode) -> &'static str {
            "grouping"
        }
    }

    fn sample_expressions() -> Vec<Expression> {
        let one = || Box::new(Expression::literal(Literal::Int(1), 1));
        vec![
            Expression::literal(Literal::Null, 1),
            Expression::string("s", 1),
            Expression::variable("v", 1),
            Expression::binary(*one(), "+", *one(), 1),
            Expression::Unary(UnaryNode { operator: "!".into(), operand: one(), line: 1 }),
            Expression::Ternary(TernaryNode { condition: one(), then_branch: one(), else_branch: one(), line: 1 }),
            Expression::Range(RangeNode { start: one(), end: one(), line: 1 }),
            Expression::Array(ArrayNode { elements: vec![], line: 1 }),
            Expression::Object(ObjectNode { entries: ObjectEntries::new(), line: 1 }),
            Expression::NamedObject(NamedObjectNode { name: "n".into(), entries: ObjectEntries::new(), line: 1 }),
            Expression::AtOperator(AtOperatorNode { name: "env".into(), args: vec![], line: 1 }),
            Expression::CrossFile(CrossFileNode { file: "a.tsk".into(), method: "get".into(), args: vec![], line: 1 }),
            Expression::PropertyAccess(PropertyAccessNode { object: one(), property: "p".into(), line: 1 }),
            Expression::MethodCall(MethodCallNode { object: one(), method: "m".into(), args: vec![], line: 1 }),
            Expression::IndexAccess(IndexAccessNode { object: one(), index: one(), line: 1 }),
            Expression::Grouping(GroupingNode { inner: one(), line: 1 }),
        ]
    }

    #[test]
    fn test_expression_dispatch_reaches_matching_method() {
        for expr in sample_expressions() {
            assert_eq!(expr.accept(&mut Tagger), expr.kind_name());
        }
    }

    #[test]
    fn test_statement_dispatch_reaches_matching_method() {
        let statements = vec![
            Statement::Comment(CommentNode { text: "c".into(), line: 1 }),
            Statement::Section(SectionNode { name: "s".into(), line: 1 }),
            Statement::GlobalVariable(GlobalVariableNode { name: "g".into(), value: Expression::string("x", 1), line: 1 }),
            Statement::Assignment(AssignmentNode { key: "k".into(), value: Expression::string("x", 1), line: 1 }),
            Statement::Include(IncludeNode { path: Expression::string("f", 1), is_import: false, line: 1 }),
        ];
        for stmt in &statements {
            assert_eq!(stmt.accept(&mut Tagger), stmt.kind_name());
        }
    }

    #[test]
    fn test_configuration_dispatch() {
        assert_eq!(Configuration::default().accept(&mut Tagger), "configuration");
    }

    #[test]
    fn test_accept_through_trait_object() {
        let mut tagger = Tagger;
        let visitor: &mut dyn Visitor<Output = &'static str> = &mut tagger;
        assert_eq!(Expression::string("x", 1).accept(visitor), "string");
    }
}
