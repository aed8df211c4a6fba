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

//! End-to-end tests through the facade.

use tusk::ast::{AssignmentNode, SectionNode};
use tusk::{
    compile, load, load_bytes, print, tokenize, ConfigMap, ConfigValue, Configuration, Expression, Literal, Statement,
    TokenKind, TuskErrorKind, TuskResultExt,
};

fn settings() -> ConfigMap {
    let mut db = ConfigMap::new();
    db.insert("host".into(), ConfigValue::from("localhost"));
    db.insert("port".into(), ConfigValue::Int(5432));
    let mut settings = ConfigMap::new();
    settings.insert("database".into(), ConfigValue::Object(db));
    settings
}

// ==================== Lexing ====================

#[test]
fn test_tokenize_section_and_object() {
    let kinds: Vec<_> = tokenize("[db]\nserver >\n  port: 1\n<\n")
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(kinds[0], TokenKind::LeftBracket);
    assert!(kinds.contains(&TokenKind::ObjectEnd));
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
}

#[test]
fn test_lex_error_context() {
    let err = tokenize("name: 'open")
        .with_context(|| format!("in {}", "app.tsk"))
        .unwrap_err();
    assert_eq!(err.kind, TuskErrorKind::Lex);
    assert_eq!(err.context.as_deref(), Some("in app.tsk"));
}

// ==================== Printing ====================

#[test]
fn test_print_assignments_in_order() {
    let config = Configuration::new(vec![
        Statement::Section(SectionNode {
            name: "db".into(),
            line: 1,
        }),
        Statement::Assignment(AssignmentNode {
            key: "port".into(),
            value: Expression::literal(Literal::Int(5432), 2),
            line: 2,
        }),
        Statement::Assignment(AssignmentNode {
            key: "host".into(),
            value: Expression::string("localhost", 3),
            line: 3,
        }),
    ]);
    let text = print(&config);
    let section = text.find("[db]").unwrap();
    let port = text.find("port: 5432").unwrap();
    let host = text.find("host: ").unwrap();
    assert!(section < port && port < host);
}

// ==================== Compiled containers ====================

#[test]
fn test_compile_then_load_bytes() {
    let bytes = compile(&settings()).unwrap();
    let store = load_bytes(&bytes).unwrap();
    assert_eq!(store.get("database.host", String::new()), "localhost");
    assert_eq!(store.get("port", 0i64), 5432);
}

#[tokio::test]
async fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.pnt");
    std::fs::write(&path, compile(&settings()).unwrap()).unwrap();

    let store = load(&path).await.unwrap();
    assert_eq!(store.get("database.port", 0u16), 5432);
}

#[tokio::test]
async fn test_load_missing_file_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.pnt");
    let err = load(&path).await.context("loading service config").unwrap_err();
    assert_eq!(err.kind, TuskErrorKind::NotFound);
    assert_eq!(err.context.as_deref(), Some("loading service config"));
}
