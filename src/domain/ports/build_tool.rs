//! BuildTool port - turns a manifest directory into an installable artifact

use std::path::Path;

use super::tool::ToolResult;

/// How the build tool should treat the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Install the built package (and its native dependencies)
    pub install: bool,
    /// Produce a detached signature next to the artifact
    pub sign: bool,
}

impl BuildOptions {
    pub fn install() -> Self {
        Self {
            install: true,
            sign: false,
        }
    }

    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }
}

pub trait BuildTool: Send + Sync {
    /// Build the manifest found in `dir`; nonzero exit is an error
    fn build(&self, dir: &Path, options: BuildOptions) -> ToolResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tool_is_object_safe() {
        fn _assert_object_safe(_: &dyn BuildTool) {}
    }

    #[test]
    fn install_options_do_not_sign_by_default() {
        let opts = BuildOptions::install();
        assert!(opts.install);
        assert!(!opts.sign);
        assert!(opts.with_sign(true).sign);
    }
}
