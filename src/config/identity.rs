//! Signing identity resolution and keychain verification.

use crate::error::{ConfigError, Error, Result};

/// Prefix the signing tool prepends itself; stripped if the user included it.
const IDENTITY_PREFIX: &str = "Developer ID Installer:";

/// Tool used to list the identities known to the system keychain.
const SECURITY: &str = "security";

/// Resolve the raw `sign` value to a bare certificate identifier.
///
/// A value starting with `$` names an environment variable holding the
/// identifier (fails if unset or empty). A literal
/// `Developer ID Installer:` prefix is stripped, since the signing step
/// adds it back itself.
pub fn resolve_identity(raw: &str) -> std::result::Result<String, ConfigError> {
    let mut identity = raw.to_string();

    if let Some(name) = identity.strip_prefix('$') {
        let name = name.to_string();
        identity = std::env::var(&name)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::UnsetEnvVar { name })?;
    }

    if let Some(stripped) = identity.strip_prefix(IDENTITY_PREFIX) {
        identity = stripped.trim_start().to_string();
    }

    Ok(identity)
}

/// Confirm the identity appears in the system keychain.
///
/// Queries `security find-identity -v` and checks the identity string
/// appears in its output.
pub async fn verify_identity(identity: &str) -> Result<()> {
    let output = tokio::process::Command::new(SECURITY)
        .args(["find-identity", "-v"])
        .output()
        .await
        .map_err(|error| Error::CommandFailed {
            tool: SECURITY.to_string(),
            error,
        })?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: SECURITY.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    if !String::from_utf8_lossy(&output.stdout).contains(identity) {
        return Err(ConfigError::UnknownIdentity {
            identity: identity.to_string(),
        }
        .into());
    }

    Ok(())
}
