// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Navigation-link resolution.
//!
//! A node link names another diagram in one of two shapes. A local link starts
//! with `./` and contains no further path separators; it names a sibling of the
//! current diagram (a file-static function). Anything else is a path relative to
//! the diagrams root. Either way the on-disk file carries a `.dot` suffix the
//! link omits.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Turns a link into the path of the diagram file it names. Purely syntactic.
pub fn resolve(current_dir: &Path, link: &str, diagrams_root: &Path) -> PathBuf {
    let is_local = link.starts_with("./") && link.matches('/').count() == 1;
    let base = if is_local {
        current_dir.join(&link[2..])
    } else {
        diagrams_root.join(link)
    };
    let mut with_suffix = OsString::from(base.into_os_string());
    with_suffix.push(".dot");
    PathBuf::from(with_suffix)
}

/// [`resolve`], then check the file actually exists.
pub fn resolve_existing(
    current_dir: &Path,
    link: &str,
    diagrams_root: &Path,
) -> Result<PathBuf, LinkResolutionError> {
    let resolved = resolve(current_dir, link, diagrams_root);
    if resolved.is_file() {
        Ok(resolved)
    } else {
        Err(LinkResolutionError {
            link: link.to_owned(),
            resolved,
        })
    }
}

/// The resolved path exists only on paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolutionError {
    link: String,
    resolved: PathBuf,
}

impl LinkResolutionError {
    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn resolved(&self) -> &Path {
        &self.resolved
    }
}

impl fmt::Display for LinkResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot follow link '{}': no diagram at {}",
            self.link,
            self.resolved.display()
        )
    }
}

impl std::error::Error for LinkResolutionError {}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use rstest::rstest;

    use super::{resolve, resolve_existing};
    use crate::model::fixtures::TempDir;

    #[rstest]
    #[case("./helper", "/graphs/drivers/usb", "/graphs/drivers/usb/helper.dot")]
    #[case("./usb_submit_urb", "/graphs/net", "/graphs/net/usb_submit_urb.dot")]
    fn local_links_resolve_next_to_the_current_diagram(
        #[case] link: &str,
        #[case] current_dir: &str,
        #[case] expected: &str,
    ) {
        let resolved = resolve(Path::new(current_dir), link, Path::new("/graphs"));
        assert_eq!(resolved, PathBuf::from(expected));
    }

    #[rstest]
    #[case("core/queue_urb", "/graphs/core/queue_urb.dot")]
    #[case("drivers/usb/host/submit", "/graphs/drivers/usb/host/submit.dot")]
    // Two separators means it is not a sibling link, even with the dot prefix.
    #[case("./a/b", "/graphs/./a/b.dot")]
    fn other_links_resolve_under_the_diagrams_root(#[case] link: &str, #[case] expected: &str) {
        let resolved = resolve(Path::new("/elsewhere"), link, Path::new("/graphs"));
        assert_eq!(resolved, PathBuf::from(expected));
    }

    #[test]
    fn resolve_existing_distinguishes_present_from_absent_targets() {
        let tmp = TempDir::new("undine-nav");
        let present = tmp.write_file("helper.dot", "digraph { a }");

        let resolved =
            resolve_existing(tmp.path(), "./helper", Path::new("/graphs")).expect("present");
        assert_eq!(resolved, present);

        let error =
            resolve_existing(tmp.path(), "./absent", Path::new("/graphs")).expect_err("absent");
        assert_eq!(error.link(), "./absent");
        assert_eq!(error.resolved(), tmp.path().join("absent.dot"));
    }
}
