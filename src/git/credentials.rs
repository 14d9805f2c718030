//! Netrc credentials for authenticated git network operations

use std::fs;
use std::io;
use std::path::Path;

/// Render a single netrc machine record
pub fn netrc_record(host: &str, login: &str, password: &str) -> String {
    format!("machine {host}\nlogin {login}\npassword {password}\n")
}

/// Write the netrc file, replacing any previous content
///
/// The file holds a token, so on unix it is restricted to the owner.
pub fn write_credentials(path: &Path, host: &str, login: &str, password: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, netrc_record(host, login, password))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
