//! Tests for the user model and its factory functions.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn password() -> Password {
    Password::new("test123").expect("fixture password")
}

#[rstest]
fn create_user_with_email_successful() {
    let password = Password::new("12345678").expect("password");
    let user = User::create(Some("test00@outlook.com"), &password, UserExtras::default())
        .expect("valid user");

    assert_eq!(user.email().as_ref(), "test00@outlook.com");
    assert!(user.check_password("12345678"));
    assert!(user.is_active());
    assert!(!user.is_staff());
    assert!(!user.is_superuser());
}

#[rstest]
fn new_user_email_is_normalized(password: Password) {
    let user =
        User::create(Some("test@OUTLOOK.COM"), &password, UserExtras::default()).expect("user");
    assert_eq!(user.email().as_ref(), "test@outlook.com");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn missing_email_is_a_contract_violation(#[case] email: Option<&str>, password: Password) {
    let err = User::create(email, &password, UserExtras::default()).expect_err("must fail");
    assert_eq!(err, CreateUserError::MissingEmail);
    assert!(err.is_contract_violation());
}

#[rstest]
fn malformed_email_is_a_validation_error(password: Password) {
    let err = User::create(Some("nobody"), &password, UserExtras::default())
        .expect_err("must fail");
    assert_eq!(err, CreateUserError::InvalidEmail(EmailError::Malformed));
    assert!(!err.is_contract_violation());
}

#[rstest]
fn create_superuser_sets_both_flags(password: Password) {
    let user = User::create_superuser(Some("test@outlook.com"), &password).expect("superuser");
    assert!(user.is_superuser());
    assert!(user.is_staff());
}

#[rstest]
fn extras_supply_the_name(password: Password) {
    let extras = UserExtras {
        name: Some("Ada".to_owned()),
    };
    let user = User::create(Some("ada@example.com"), &password, extras).expect("user");
    assert_eq!(user.name().as_ref(), "Ada");
}

#[rstest]
fn overlong_name_is_rejected(password: Password) {
    let extras = UserExtras {
        name: Some("n".repeat(USER_NAME_MAX + 1)),
    };
    let err = User::create(Some("ada@example.com"), &password, extras).expect_err("must fail");
    assert!(matches!(err, CreateUserError::InvalidName(_)));
}

#[rstest]
fn set_password_rehashes(password: Password) {
    let mut user = User::create(Some("ada@example.com"), &password, UserExtras::default())
        .expect("user");
    let next = Password::new("another-secret").expect("password");
    user.set_password(&next).expect("rehash");

    assert!(user.check_password("another-secret"));
    assert!(!user.check_password("test123"));
}

#[rstest]
fn records_round_trip_without_rehashing(password: Password) {
    let user = User::create_superuser(Some("root@example.com"), &password).expect("user");
    let restored = User::from_record(user.to_record());
    assert_eq!(restored, user);
    assert!(restored.check_password("test123"));
}
