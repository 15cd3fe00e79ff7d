//! Command-line adapters for the domain ports

mod git;
mod gpg;
mod makepkg;
mod pacman;
mod repo_add;

pub use git::Git;
pub use gpg::Gpg;
pub use makepkg::Makepkg;
pub use pacman::Pacman;
pub use repo_add::RepoAdd;
