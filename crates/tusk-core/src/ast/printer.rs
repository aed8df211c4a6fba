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

//! Re-emits TuskTsk source from an AST.

use super::nodes::*;
use super::visitor::Visitor;
use crate::lex::Literal;

/// Typed visitor rendering each node back to source text.
///
/// Object keys come out in their original order, so printing a parsed
/// configuration reproduces its structure line for line.
#[derive(Debug, Clone)]
pub struct SourcePrinter {
    indent: String,
    level: usize,
}

impl Default for SourcePrinter {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            level: 0,
        }
    }
}

impl SourcePrinter {
    /// Printer indenting named-object bodies by two spaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom indent unit.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Render a whole configuration.
    pub fn print(&mut self, config: &Configuration) -> String {
        config.accept(self)
    }

    fn join(&mut self, exprs: &[Expression]) -> String {
        exprs.iter().map(|e| e.accept(self)).collect::<Vec<_>>().join(", ")
    }
}

fn quote(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

fn key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        quote(name, '"')
    }
}

impl Visitor for SourcePrinter {
    type Output = String;

    fn visit_configuration(&mut self, node: &Configuration) -> String {
        let mut out = String::new();
        for stmt in &node.statements {
            out.push_str(&stmt.accept(self));
            out.push('\n');
        }
        out
    }

    fn visit_comment(&mut self, node: &CommentNode) -> String {
        format!("# {}", node.text)
    }

    fn visit_section(&mut self, node: &SectionNode) -> String {
        format!("[{}]", node.name)
    }

    fn visit_global_variable(&mut self, node: &GlobalVariableNode) -> String {
        format!("${}: {}", node.name, node.value.accept(self))
    }

    fn visit_assignment(&mut self, node: &AssignmentNode) -> String {
        format!("{}: {}", key(&node.key), node.value.accept(self))
    }

    fn visit_include(&mut self, node: &IncludeNode) -> String {
        let keyword = if node.is_import { "import" } else { "include" };
        format!("{} {}", keyword, node.path.accept(self))
    }

    fn visit_literal(&mut self, node: &LiteralNode) -> String {
        match &node.value {
            Literal::String(s) => quote(s, '"'),
            Literal::Double(d) => format!("{:?}", d),
            other => other.to_string(),
        }
    }

    fn visit_string(&mut self, node: &StringNode) -> String {
        quote(&node.value, if node.is_template { '`' } else { '"' })
    }

    fn visit_variable(&mut self, node: &VariableNode) -> String {
        if node.is_global {
            format!("${}", node.name)
        } else {
            node.name.clone()
        }
    }

    fn visit_binary(&mut self, node: &BinaryNode) -> String {
        let left = node.left.accept(self);
        let right = node.right.accept(self);
        format!("{} {} {}", left, node.operator, right)
    }

    fn visit_unary(&mut self, node: &UnaryNode) -> String {
        let operand = node.operand.accept(self);
        if node.operator.chars().all(|c| c.is_ascii_alphabetic()) {
            format!("{} {}", node.operator, operand)
        } else {
            format!("{}{}", node.operator, operand)
        }
    }

    fn visit_ternary(&mut self, node: &TernaryNode) -> String {
        let condition = node.condition.accept(self);
        let then_branch = node.then_branch.accept(self);
        let else_branch = node.else_branch.accept(self);
        format!("{} ? {} : {}", condition, then_branch, else_branch)
    }

    fn visit_range(&mut self, node: &RangeNode) -> String {
        let start = node.start.accept(self);
        let end = node.end.accept(self);
        format!("{}-{}", start, end)
    }

    fn visit_array(&mut self, node: &ArrayNode) -> String {
        format!("[{}]", self.join(&node.elements))
    }

    fn visit_object(&mut self, node: &ObjectNode) -> String {
        if node.entries.is_empty() {
            return "{}".to_string();
        }
        let body: Vec<String> = node
            .entries
            .iter()
            .map(|(k, v)| format!("{}: {}", key(k), v.accept(self)))
            .collect();
        format!("{{ {} }}", body.join(", "))
    }

    fn visit_named_object(&mut self, node: &NamedObjectNode) -> String {
        let outer = self.indent.repeat(self.level);
        self.level += 1;
        let inner = self.indent.repeat(self.level);

        let mut out = format!("{} >\n", node.name);
        for (k, v) in &node.entries {
            let value = v.accept(self);
            out.push_str(&format!("{}{}: {}\n", inner, key(k), value));
        }
        out.push_str(&outer);
        out.push('<');

        self.level -= 1;
        out
    }

    fn visit_at_operator(&mut self, node: &AtOperatorNode) -> String {
        format!("@{}({})", node.name, self.join(&node.args))
    }

    fn visit_cross_file(&mut self, node: &CrossFileNode) -> String {
        format!("@{}.{}({})", node.file, node.method, self.join(&node.args))
    }

    fn visit_property_access(&mut self, node: &PropertyAccessNode) -> String {
        format!("{}.{}", node.object.accept(self), node.property)
    }

    fn visit_method_call(&mut self, node: &MethodCallNode) -> String {
        let object = node.object.accept(self);
        format!("{}.{}({})", object, node.method, self.join(&node.args))
    }

    fn visit_index_access(&mut self, node: &IndexAccessNode) -> String {
        let object = node.object.accept(self);
        format!("{}[{}]", object, node.index.accept(self))
    }

    fn visit_grouping(&mut self, node: &GroupingNode) -> String {
        format!("({})", node.inner.accept(self))
    }
}
