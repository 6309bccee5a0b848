use serde::Serialize;

/// A rejected form field with the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

pub const NAME_MESSAGE: &str = "Enter your name and surname separated by a space.";
pub const EMAIL_MESSAGE: &str = "Enter a valid e-mail address.";

/// Checks an add-user submission. Returns every failing field at once so
/// the form can show all warnings in a single round trip.
pub fn validate_new_user(name: &str, email: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if !has_name_and_surname(name) {
        errors.push(FieldError {
            field: "name",
            message: NAME_MESSAGE,
        });
    }

    if !is_valid_email(email) {
        errors.push(FieldError {
            field: "email",
            message: EMAIL_MESSAGE,
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// At least two whitespace-separated words.
fn has_name_and_surname(name: &str) -> bool {
    name.split_whitespace().nth(1).is_some()
}

/// Structural check only: one '@', non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    domain.contains('.') && labels.all(|label| !label.is_empty())
}
