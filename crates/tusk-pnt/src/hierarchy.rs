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

//! Directory cascade discovery.

use std::io;
use std::path::{Path, PathBuf};

/// File name looked up in each directory of a cascade.
pub const HIERARCHY_FILE_NAME: &str = "peanu.pnt";

/// Collect `peanu.pnt` files from `start` up to the filesystem root.
///
/// The result is ordered root first, so merging in order lets files closer
/// to `start` override those further up.
pub fn find_hierarchy(start: &Path) -> io::Result<Vec<PathBuf>> {
    let start = start.canonicalize()?;
    let mut found: Vec<PathBuf> = start
        .ancestors()
        .map(|dir| dir.join(HIERARCHY_FILE_NAME))
        .filter(|candidate| candidate.is_file())
        .collect();
    found.reverse();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_root_first_order() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("a").join("b");
        fs::create_dir_all(&child).unwrap();
        fs::write(dir.path().join(HIERARCHY_FILE_NAME), b"").unwrap();
        fs::write(child.join(HIERARCHY_FILE_NAME), b"").unwrap();

        let found = find_hierarchy(&child).unwrap();
        let ours: Vec<_> = found.iter().filter(|p| p.starts_with(dir.path().canonicalize().unwrap())).collect();
        assert_eq!(ours.len(), 2);
        assert_eq!(ours[0].parent().unwrap(), dir.path().canonicalize().unwrap());
        assert_eq!(ours[1].parent().unwrap(), child.canonicalize().unwrap());
    }

    #[test]
    fn test_directories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(HIERARCHY_FILE_NAME)).unwrap();
        let found = find_hierarchy(dir.path()).unwrap();
        assert!(!found.iter().any(|p| p.starts_with(dir.path().canonicalize().unwrap())));
    }

    #[test]
    fn test_missing_start_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_hierarchy(&dir.path().join("gone")).is_err());
    }
}
