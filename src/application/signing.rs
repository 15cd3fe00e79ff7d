//! Local signing identity

use crate::domain::ports::{identity_email, Signer};
use crate::error::{BridgeError, BridgeResult};

/// E-mail of the local secret key
pub fn signing_email(signer: &dyn Signer) -> BridgeResult<String> {
    let identity = signer
        .identity()
        .map_err(|e| BridgeError::Key(format!("unable to read signing identity: {}", e.output.trim())))?;
    identity_email(&identity)
        .ok_or_else(|| BridgeError::Key(format!("no e-mail in signing identity: {}", identity.trim())))
}

/// Armored public half of the local signing key, for registry operators
/// to import before accepting pushes.
pub fn export_public_key(signer: &dyn Signer) -> BridgeResult<String> {
    let email = signing_email(signer)?;
    signer
        .export_public_key(&email)
        .map_err(|e| BridgeError::Key(e.output.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ToolError, ToolResult};
    use std::path::Path;
    use std::sync::Mutex;

    const KEY: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----\n\nmDMEZ\n-----END PGP PUBLIC KEY BLOCK-----\n";

    struct KeyRing {
        identity: Result<&'static str, &'static str>,
        exported: Mutex<Vec<String>>,
    }

    impl KeyRing {
        fn new(identity: Result<&'static str, &'static str>) -> Self {
            Self {
                identity,
                exported: Mutex::new(Vec::new()),
            }
        }
    }

    impl Signer for KeyRing {
        fn identity(&self) -> ToolResult {
            self.identity
                .map(str::to_string)
                .map_err(|e| ToolError::new("gpg", Some(2), e))
        }
        fn verify(&self, _: &Path, _: &Path) -> ToolResult {
            Ok(String::new())
        }
        fn export_public_key(&self, email: &str) -> ToolResult {
            self.exported.lock().unwrap().push(email.to_string());
            if email == "jane@doe.org" {
                Ok(KEY.to_string())
            } else {
                Err(ToolError::new("gpg", Some(2), format!("gpg: no public key for {email}\n")))
            }
        }
    }

    #[test]
    fn exports_the_key_of_the_signing_email() {
        let ring = KeyRing::new(Ok("Jane Doe <jane@doe.org>"));
        assert_eq!(export_public_key(&ring).unwrap(), KEY);
        assert_eq!(*ring.exported.lock().unwrap(), vec!["jane@doe.org"]);
    }

    #[test]
    fn missing_identity_or_key_is_reported() {
        let ring = KeyRing::new(Err("gpg: no secret key"));
        let err = export_public_key(&ring).unwrap_err();
        assert_eq!(err.to_string(), "signing key: unable to read signing identity: gpg: no secret key");
        assert!(ring.exported.lock().unwrap().is_empty());

        let ring = KeyRing::new(Ok("Jane"));
        assert!(matches!(export_public_key(&ring), Err(BridgeError::Key(_))));

        let ring = KeyRing::new(Ok("Other <other@doe.org>"));
        let err = export_public_key(&ring).unwrap_err();
        assert!(err.to_string().contains("no public key for other@doe.org"));
    }
}
