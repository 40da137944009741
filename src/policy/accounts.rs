//! Account form rules: password confirmation and administrator protection.

use super::PolicyError;
use crate::models::user::{Role, User};

/// Both password fields of a creation form must match.
pub fn confirm_password<'a>(password: &'a str, confirmation: &str) -> Result<&'a str, PolicyError> {
    if password != confirmation {
        return Err(PolicyError::PasswordMismatch);
    }
    Ok(password)
}

/// On edit the password is optional; when either field is filled in they
/// must match. Empty strings count as "not filled in".
pub fn confirm_new_password<'a>(
    password: Option<&'a str>,
    confirmation: Option<&str>,
) -> Result<Option<&'a str>, PolicyError> {
    let password = password.filter(|p| !p.is_empty());
    let confirmation = confirmation.filter(|p| !p.is_empty());

    match (password, confirmation) {
        (None, None) => Ok(None),
        (Some(p), Some(c)) if p == c => Ok(Some(p)),
        _ => Err(PolicyError::PasswordMismatch),
    }
}

/// Only administrators delete users, and never another administrator.
pub fn can_delete_user(actor: Role, target: &User) -> Result<(), PolicyError> {
    if actor != Role::Administrator {
        return Err(PolicyError::PermissionDenied);
    }
    if target.role == Role::Administrator {
        return Err(PolicyError::CannotDeleteAdministrator);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_password() {
        assert_eq!(confirm_password("hunter22", "hunter22"), Ok("hunter22"));
        assert_eq!(confirm_password("hunter22", "hunter23"), Err(PolicyError::PasswordMismatch));
    }

    #[test]
    fn test_confirm_new_password() {
        assert_eq!(confirm_new_password(None, None), Ok(None));
        assert_eq!(confirm_new_password(Some(""), Some("")), Ok(None));
        assert_eq!(confirm_new_password(Some("abcd"), Some("abcd")), Ok(Some("abcd")));
        assert_eq!(confirm_new_password(Some("abcd"), None), Err(PolicyError::PasswordMismatch));
        assert_eq!(confirm_new_password(None, Some("abcd")), Err(PolicyError::PasswordMismatch));
    }

    #[test]
    fn test_administrators_are_protected() {
        let admin = User::fixture(1, "root", Role::Administrator);
        let student = User::fixture(2, "maria", Role::Student);

        assert_eq!(
            can_delete_user(Role::Administrator, &admin),
            Err(PolicyError::CannotDeleteAdministrator)
        );
        assert_eq!(can_delete_user(Role::Administrator, &student), Ok(()));
        assert_eq!(
            can_delete_user(Role::Librarian, &student),
            Err(PolicyError::PermissionDenied)
        );
    }
}
