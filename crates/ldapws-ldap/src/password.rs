//! Password write strategies.
//!
//! Servers advertising the Password Modify extended operation get the
//! password through it so they can hash it themselves. Otherwise the
//! attribute is replaced directly: `unicodePwd` for Active Directory,
//! `userPassword` for everything else.

use ldapws_core::directory::Modification;

/// How a new password reaches the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrategy {
    /// RFC 3062 Password Modify extended operation.
    ExtendedOperation,
    /// Replace Active Directory's `unicodePwd`.
    UnicodePwd,
    /// Replace `userPassword`.
    UserPassword,
}

impl PasswordStrategy {
    /// Pick the strategy for a server.
    #[must_use]
    pub fn choose(exop_supported: bool, use_unicode_password: bool) -> Self {
        match (exop_supported, use_unicode_password) {
            (true, _) => PasswordStrategy::ExtendedOperation,
            (false, true) => PasswordStrategy::UnicodePwd,
            (false, false) => PasswordStrategy::UserPassword,
        }
    }

    /// Attribute replacement for the non-exop strategies.
    #[must_use]
    pub fn modification(self, password: &str) -> Option<Modification> {
        match self {
            PasswordStrategy::ExtendedOperation => None,
            PasswordStrategy::UnicodePwd => Some(Modification::replace(
                "unicodePwd",
                encode_unicode_password(password),
            )),
            PasswordStrategy::UserPassword => {
                Some(Modification::replace("userPassword", password))
            }
        }
    }
}

/// Encode a plaintext password for AD's `unicodePwd` attribute.
///
/// The password is surrounded with double quotes and then encoded as UTF-16LE.
#[must_use]
pub fn encode_unicode_password(password: &str) -> Vec<u8> {
    let quoted = format!("\"{password}\"");
    quoted.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
