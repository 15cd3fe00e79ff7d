//! Signer port - detached signatures and the local signing identity

use std::path::Path;

use super::tool::ToolResult;

pub trait Signer: Send + Sync {
    /// Raw identity of the local secret key, e.g. `Jane Doe <jane@doe.org>`
    fn identity(&self) -> ToolResult;

    /// Verify `signature` is a valid detached signature over `artifact`
    fn verify(&self, artifact: &Path, signature: &Path) -> ToolResult;

    /// ASCII-armored public key of `email`
    fn export_public_key(&self, email: &str) -> ToolResult;
}

/// Extract the e-mail between `<` and `>` of an identity string
pub fn identity_email(identity: &str) -> Option<String> {
    let start = identity.find('<')?;
    let rest = &identity[start + 1..];
    let end = rest.find('>')?;
    let email = rest[..end].trim();
    (!email.is_empty()).then(|| email.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_email_extracts_address() {
        assert_eq!(
            identity_email("Jane Doe <jane@doe.org>").as_deref(),
            Some("jane@doe.org")
        );
        assert_eq!(identity_email("no brackets"), None);
        assert_eq!(identity_email("Empty <>"), None);
    }
}
