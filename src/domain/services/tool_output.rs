//! Classification of captured tool output
//!
//! External tools report some benign conditions as failures. The rules for
//! recognising them live here, as plain functions over captured text, so they
//! can be tested without running any tool.

use std::collections::HashSet;

/// `git checkout` on the ref that is already checked out
pub const ALREADY_ON: &str = "Already on ";

/// `git clone` into a directory that already holds a clone
pub const EXISTING_CLONE: &str = "already exists and is not an empty directory";

/// `git remote show <origin>` line naming the default branch
pub const HEAD_BRANCH: &str = "HEAD branch: ";

/// `pacman -R` prefix for names it does not know
pub const TARGET_NOT_FOUND: &str = "error: target not found: ";

/// A failed checkout whose output says the tree is already on the target.
pub fn is_already_on_target(output: &str) -> bool {
    output
        .lines()
        .any(|line| line.trim_start().starts_with(ALREADY_ON))
}

/// A failed clone because the destination is an existing, non-empty clone.
pub fn is_existing_clone(output: &str) -> bool {
    output.contains(EXISTING_CLONE)
}

/// Default branch from `git remote show <remote>` output.
pub fn parse_head_branch(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (_, branch) = line.split_once(HEAD_BRANCH)?;
        let branch = branch.trim();
        (!branch.is_empty() && branch != "(unknown)").then(|| branch.to_string())
    })
}

/// First remote name from `git remote` output.
pub fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Newline-separated names (e.g. `pacman -Ssq`) as a set.
pub fn parse_name_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Names the package manager reported as unknown during removal.
pub fn missing_targets(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|l| l.trim().strip_prefix(TARGET_NOT_FOUND))
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// `uid` line of `gpg --list-secret-keys` → `Name <email>`.
pub fn parse_gpg_uid(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix("uid")?;
        let rest = rest.trim_start();
        // Skip the optional `[ultimate]` validity marker.
        let rest = match rest.strip_prefix('[') {
            Some(r) => r.split_once(']').map(|(_, tail)| tail).unwrap_or(r),
            None => rest,
        };
        let uid = rest.trim();
        (!uid.is_empty()).then(|| uid.to_string())
    })
}

/// `gpg --armor --export` prints nothing (exit 0) for an unknown key.
pub fn is_armored_public_key(output: &str) -> bool {
    output.contains("-----BEGIN PGP PUBLIC KEY BLOCK-----")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_on_is_recognised_on_any_line() {
        assert!(is_already_on_target("Already on 'main'\n"));
        assert!(is_already_on_target(
            "warning: something\nAlready on 'main'\nYour branch is up to date"
        ));
        assert!(!is_already_on_target(
            "error: pathspec 'v9' did not match any file(s) known to git"
        ));
    }

    #[test]
    fn existing_clone_is_recognised() {
        assert!(is_existing_clone(
            "fatal: destination path 'tool' already exists and is not an empty directory.\n"
        ));
        assert!(!is_existing_clone("fatal: repository not found"));
    }

    #[test]
    fn head_branch_is_parsed() {
        let out = "* remote origin\n  Fetch URL: https://x/y\n  HEAD branch: trunk\n  Remote branches:\n";
        assert_eq!(parse_head_branch(out).as_deref(), Some("trunk"));
        assert_eq!(parse_head_branch("  HEAD branch: (unknown)\n"), None);
    }

    #[test]
    fn name_list_ignores_blank_lines() {
        let names = parse_name_list("vim\n\ngit\n  curl \n");
        assert_eq!(names.len(), 3);
        assert!(names.contains("curl"));
    }

    #[test]
    fn missing_targets_are_extracted() {
        let out = "error: target not found: nope\nerror: target not found: gone\n";
        assert_eq!(missing_targets(out), vec!["nope", "gone"]);
    }

    #[test]
    fn gpg_uid_is_parsed() {
        let out = "sec   ed25519 2023-01-01 [SC]\n      ABCDEF\nuid           [ultimate] Jane Doe <jane@doe.org>\nssb   cv25519\n";
        assert_eq!(
            parse_gpg_uid(out).as_deref(),
            Some("Jane Doe <jane@doe.org>")
        );
        assert_eq!(parse_gpg_uid("sec only\n"), None);
    }

    #[test]
    fn armored_key_is_recognised() {
        let key = "-----BEGIN PGP PUBLIC KEY BLOCK-----\n\nmDMEZ\n-----END PGP PUBLIC KEY BLOCK-----\n";
        assert!(is_armored_public_key(key));
        assert!(!is_armored_public_key(""));
        assert!(!is_armored_public_key("gpg: WARNING: nothing exported\n"));
    }
}
