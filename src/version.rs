//! Build information embedded by `build.rs`

use std::fmt;

/// Compile-time build metadata
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Short commit hash, or "unknown" outside a git checkout
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    git_dirty: &'static str,
    pub build_timestamp: &'static str,
    pub target: &'static str,
    /// Cargo profile ("debug" or "release")
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("LINKUP_GIT_HASH"),
            git_branch: env!("LINKUP_GIT_BRANCH"),
            git_dirty: env!("LINKUP_GIT_DIRTY"),
            build_timestamp: env!("LINKUP_BUILD_TIMESTAMP"),
            target: env!("LINKUP_TARGET"),
            profile: env!("LINKUP_PROFILE"),
            rustc_version: env!("LINKUP_RUSTC_VERSION"),
        }
    }

    pub fn git_dirty(&self) -> bool {
        self.git_dirty == "true"
    }

    /// "0.1.0-abc1234", with "-dirty" appended for uncommitted builds
    pub fn full_version(&self) -> String {
        let mut version = format!("{}-{}", self.version, self.git_hash);
        if self.git_dirty() {
            version.push_str("-dirty");
        }
        version
    }

    /// One-line banner for the interactive console
    pub fn banner(&self) -> String {
        format!("LinkUp {} ({})", self.version, self.git_hash)
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        writeln!(f, "  Version:    {}", self.version)?;
        writeln!(
            f,
            "  Git Hash:   {}{}",
            self.git_hash,
            if self.git_dirty() { " (dirty)" } else { "" }
        )?;
        writeln!(f, "  Git Branch: {}", self.git_branch)?;
        writeln!(f, "  Built:      {}", self.build_timestamp)?;
        writeln!(f, "  Profile:    {}", self.profile)?;
        writeln!(f, "  Target:     {}", self.target)?;
        writeln!(f, "  Compiler:   {}", self.rustc_version)?;
        Ok(())
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}
