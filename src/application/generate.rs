//! Generate Use Case
//!
//! Writes a starter `PKGBUILD` for the git checkout in a directory and,
//! optionally, appends install instructions to its `README.md`. Name and
//! url come from the checkout's origin remote.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::entities::MANIFEST_FILE;
use crate::domain::ports::{BridgeEvent, EventSink, VersionControl};
use crate::error::{BridgeError, BridgeResult};

use super::source::{remote_address, vcs_error};

pub const README_FILE: &str = "README.md";

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Also append install instructions to the README
    pub readme: bool,
    /// Replace an existing PKGBUILD
    pub force: bool,
}

pub struct GenerateUseCase<'a> {
    vcs: &'a dyn VersionControl,
    events: &'a dyn EventSink,
}

impl<'a> GenerateUseCase<'a> {
    pub fn new(vcs: &'a dyn VersionControl, events: &'a dyn EventSink) -> Self {
        Self { vcs, events }
    }

    /// Write the templates into `dir`. Returns the files written.
    pub fn generate(&self, dir: &Path, options: GenerateOptions) -> BridgeResult<Vec<PathBuf>> {
        let url = self
            .vcs
            .remote_url(dir)
            .map_err(vcs_error("config", dir))?;
        let address = remote_address(&url).ok_or_else(|| BridgeError::Vcs {
            action: "config".to_string(),
            dir: dir.to_path_buf(),
            output: format!("origin url '{}' names no repository", url.trim()),
        })?;
        let name = address.rsplit('/').next().unwrap_or(&address).to_string();

        let manifest = dir.join(MANIFEST_FILE);
        if manifest.exists() && !options.force {
            return Err(BridgeError::Manifest {
                path: manifest,
                message: "already exists; use --force to replace it".to_string(),
            });
        }
        fs::write(&manifest, manifest_template(&name, &format!("https://{address}")))?;
        let mut files = vec![manifest];

        if options.readme {
            let readme = dir.join(README_FILE);
            if append_install_section(&readme, &address)? {
                files.push(readme);
            }
        }

        self.events.on_event(BridgeEvent::Generated {
            package: name,
            files: files.clone(),
        });
        Ok(files)
    }
}

/// Starter manifest; every dependency array is empty.
pub fn manifest_template(name: &str, url: &str) -> String {
    format!(
        r#"# Starter PKGBUILD. Adjust the arrays and functions below.

pkgname="{name}"
pkgdesc=""
pkgver="1"
pkgrel="1"
arch=('any')
url="{url}"

# Runtime dependencies: host package names or host/owner/repo[@pin]
depends=(
  # 'glibc'
  # 'github.com/owner/lib@v1.0.0'
)

# Build-time dependencies, same forms
makedepends=(
  # 'make'
)

build() {{
  cd ..
  make build
}}

package() {{
  cd ..
  install -Dm755 {name} "$pkgdir/usr/bin/{name}"
}}
"#
    )
}

fn install_line(address: &str) -> String {
    format!("pkgbridge install {address}")
}

/// Append install instructions unless the README already carries them.
/// Returns whether the file changed.
fn append_install_section(readme: &Path, address: &str) -> BridgeResult<bool> {
    let line = install_line(address);
    let existing = match fs::read_to_string(readme) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.contains(&line) {
        return Ok(false);
    }
    let mut file = OpenOptions::new().create(true).append(true).open(readme)?;
    write!(
        file,
        "\n\n---\n\n### Install with pkgbridge\n\n```\n{line}\n```\n"
    )?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeVcs, RecordingSink};
    use crate::domain::services::manifest;
    use tempfile::tempdir;

    fn vcs(remote: &str) -> FakeVcs {
        FakeVcs {
            remote: remote.to_string(),
            ..FakeVcs::default()
        }
    }

    #[test]
    fn writes_manifest_and_readme_from_the_origin() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(README_FILE), "# tool\n").unwrap();
        let vcs = vcs("git@github.com:owner/tool.git\n");
        let sink = RecordingSink::default();

        let files = GenerateUseCase::new(&vcs, &sink)
            .generate(dir.path(), GenerateOptions { readme: true, force: false })
            .unwrap();

        assert_eq!(
            files,
            vec![dir.path().join(MANIFEST_FILE), dir.path().join(README_FILE)]
        );
        let content = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(manifest::read_scalar(&content, "pkgname").as_deref(), Some("tool"));
        assert_eq!(
            manifest::read_scalar(&content, "url").as_deref(),
            Some("https://github.com/owner/tool")
        );
        assert!(manifest::read_dependencies(&content).is_empty());

        let readme = fs::read_to_string(dir.path().join(README_FILE)).unwrap();
        assert!(readme.starts_with("# tool\n"));
        assert!(readme.contains("pkgbridge install github.com/owner/tool"));
        assert_eq!(
            sink.events(),
            vec![BridgeEvent::Generated {
                package: "tool".to_string(),
                files,
            }]
        );
    }

    #[test]
    fn readme_section_is_added_once() {
        let dir = tempdir().unwrap();
        let vcs = vcs("https://github.com/owner/tool");
        let sink = RecordingSink::default();
        let use_case = GenerateUseCase::new(&vcs, &sink);
        let options = GenerateOptions { readme: true, force: true };

        use_case.generate(dir.path(), options).unwrap();
        let files = use_case.generate(dir.path(), options).unwrap();

        assert_eq!(files, vec![dir.path().join(MANIFEST_FILE)]);
        let readme = fs::read_to_string(dir.path().join(README_FILE)).unwrap();
        assert_eq!(readme.matches("pkgbridge install github.com/owner/tool").count(), 1);
    }

    #[test]
    fn existing_manifest_is_kept_without_force() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "pkgname=mine\n").unwrap();
        let vcs = vcs("https://github.com/owner/tool");
        let sink = RecordingSink::default();

        let err = GenerateUseCase::new(&vcs, &sink)
            .generate(dir.path(), GenerateOptions::default())
            .unwrap_err();

        assert!(matches!(err, BridgeError::Manifest { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap(),
            "pkgname=mine\n"
        );
        assert!(!dir.path().join(README_FILE).exists());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn template_only_leaves_the_readme_alone() {
        let dir = tempdir().unwrap();
        let vcs = vcs("https://github.com/owner/tool.git");
        let sink = RecordingSink::default();

        let files = GenerateUseCase::new(&vcs, &sink)
            .generate(dir.path(), GenerateOptions::default())
            .unwrap();

        assert_eq!(files, vec![dir.path().join(MANIFEST_FILE)]);
        assert!(!dir.path().join(README_FILE).exists());
    }

    #[test]
    fn checkout_without_origin_is_an_error() {
        let dir = tempdir().unwrap();
        let vcs = vcs("");
        let sink = RecordingSink::default();

        let err = GenerateUseCase::new(&vcs, &sink)
            .generate(dir.path(), GenerateOptions::default())
            .unwrap_err();

        assert!(matches!(err, BridgeError::Vcs { .. }));
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }
}
