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

//! Abstract syntax tree for TuskTsk configurations.
//!
//! Two node families hang off a [`Configuration`] root: [`Statement`]s
//! (declarations) and [`Expression`]s (values). The node set is closed;
//! operations over it are written as visitors:
//!
//! - [`Visitor`] - typed double dispatch, one method per node, each
//!   returning `Output` (see [`SourcePrinter`])
//! - [`NodeVisitor`] + [`walk`] - void traversal with default no-op
//!   callbacks (see [`NodeCounter`])

mod nodes;
mod printer;
mod visitor;
mod walk;

pub use nodes::*;
pub use printer::SourcePrinter;
pub use visitor::Visitor;
pub use walk::{walk, NodeCounter, NodeVisitor, WalkContext};
