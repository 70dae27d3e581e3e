use super::*;

#[test]
fn register_form_mismatch_is_rejected() {
    let form = RegisterForm {
        name: "A".into(),
        email: "a@b.com".into(),
        password: "pw".into(),
        confirm_password: "pw2".into(),
    };
    assert_eq!(form.validate(), Err(FormError::PasswordMismatch));
    assert_eq!(FormError::PasswordMismatch.to_string(), "Passwords do not match");
}

#[test]
fn register_form_trims_name_and_email() {
    let form = RegisterForm {
        name: " A ".into(),
        email: " a@b.com".into(),
        password: "pw".into(),
        confirm_password: "pw".into(),
    };
    assert_eq!(form.validate().unwrap(), RegisterCredentials::new("A", "a@b.com", "pw"));
}

#[test]
fn login_form_keeps_password_verbatim() {
    let form = LoginForm { email: "a@b.com ".into(), password: " pw ".into() };
    assert_eq!(form.credentials(), LoginCredentials::new("a@b.com", " pw "));
}

#[test]
fn mode_toggles() {
    assert_eq!(AuthMode::default(), AuthMode::Login);
    assert_eq!(AuthMode::Login.toggled(), AuthMode::Register);
    assert_eq!(AuthMode::Register.toggled(), AuthMode::Login);
}

// =============================================================================
// submit_error_message
// =============================================================================

#[test]
fn server_message_is_shown_verbatim() {
    let err = AuthError::AuthRejected { message: Some("Invalid credentials".into()) };
    assert_eq!(submit_error_message(&err, AuthMode::Login), "Invalid credentials");
}

#[test]
fn missing_message_uses_mode_fallback() {
    let err = AuthError::NetworkFailure("connection refused".into());
    assert_eq!(submit_error_message(&err, AuthMode::Login), "Login failed");
    assert_eq!(submit_error_message(&err, AuthMode::Register), "Registration failed");
}

#[test]
fn busy_explains_itself() {
    assert_eq!(submit_error_message(&AuthError::Busy, AuthMode::Login), "another sign-in is already in progress");
}
