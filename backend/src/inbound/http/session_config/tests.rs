//! Unit tests for session settings.

use std::collections::HashMap;
use std::io::Write;

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &NamedTempFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, path_of(key)),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn release_with(
    key: &NamedTempFile,
    name: &'static str,
    value: Option<&str>,
) -> Result<SessionSettings, SessionConfigError> {
    let mut vars = release_vars(key);
    match value {
        Some(value) => vars.insert(name, value.to_owned()),
        None => vars.remove(name),
    };
    session_settings_from_env(&mock_env(vars), BuildMode::Release)
}

#[rstest]
fn release_accepts_a_complete_configuration(release_key: NamedTempFile) {
    let settings = session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
        .expect("valid release settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(release_key: NamedTempFile, #[case] name: &'static str) {
    let error = release_with(&release_key, name, None).err().expect("missing toggle fails");
    assert!(matches!(error, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(COOKIE_SECURE_ENV, "")]
#[case(ALLOW_EPHEMERAL_ENV, "sometimes")]
#[case(SAMESITE_ENV, "Loose")]
fn release_rejects_unparseable_values(
    release_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let error = release_with(&release_key, name, Some(value))
        .err()
        .expect("invalid value fails");
    assert!(matches!(error, SessionConfigError::InvalidEnv { name: invalid, .. } if invalid == name));
}

#[rstest]
fn release_rejects_samesite_none_without_secure(release_key: NamedTempFile) {
    let mut vars = release_vars(&release_key);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());
    let error = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .err()
        .expect("insecure SameSite=None fails");
    assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
    let error = release_with(&release_key, ALLOW_EPHEMERAL_ENV, Some("1"))
        .err()
        .expect("ephemeral keys fail in release");
    assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let error = session_settings_from_env(&mock_env(release_vars(&short)), BuildMode::Release)
        .err()
        .expect("short key fails");
    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort { length, min_len: SESSION_KEY_MIN_LEN, .. }
            if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_reports_unreadable_key_files(release_key: NamedTempFile) {
    let error = release_with(&release_key, KEY_FILE_ENV, Some("/nonexistent/session_key"))
        .err()
        .expect("missing key file fails");
    assert!(matches!(error, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, "/nonexistent/session_key".to_owned());
    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("garbage", SameSite::Lax)]
#[case("strict", SameSite::Strict)]
#[case("NONE", SameSite::None)]
fn debug_tolerates_any_samesite_value(#[case] value: &str, #[case] expected: SameSite) {
    let mut vars = HashMap::new();
    vars.insert(KEY_FILE_ENV, "/nonexistent/session_key".to_owned());
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, value.to_owned());
    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.same_site, expected);
}

fn debug_key(file: &NamedTempFile) -> Key {
    let vars = HashMap::from([(KEY_FILE_ENV, path_of(file))]);
    session_settings_from_env(&mock_env(vars), BuildMode::Debug)
        .expect("debug settings")
        .key
}

#[rstest]
fn debug_accepts_short_keys() {
    let short = key_file(SESSION_KEY_DERIVE_MIN_LEN);
    assert_eq!(debug_key(&short).master(), debug_key(&short).master());
}

#[rstest]
#[case(0)]
#[case(8)]
#[case(SESSION_KEY_DERIVE_MIN_LEN - 1)]
fn debug_replaces_underived_keys_with_ephemeral_ones(#[case] len: usize) {
    let tiny = key_file(len);
    assert_ne!(debug_key(&tiny).master(), debug_key(&tiny).master());
}

#[rstest]
fn the_same_key_file_yields_the_same_key(release_key: NamedTempFile) {
    let first = session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
        .expect("first read");
    let second = session_settings_from_env(&mock_env(release_vars(&release_key)), BuildMode::Release)
        .expect("second read");
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
#[case("1", Some(true))]
#[case(" Yes ", Some(true))]
#[case("y", Some(true))]
#[case("FALSE", Some(false))]
#[case("n", Some(false))]
#[case("2", None)]
fn parse_bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[actix_web::test]
async fn middleware_issues_an_http_only_session_cookie() {
    use actix_session::Session;
    use actix_web::{App, HttpResponse, test, web};

    let settings = SessionSettings {
        key: Key::generate(),
        cookie_secure: true,
        same_site: SameSite::Strict,
    };
    let app = test::init_service(App::new().wrap(settings.middleware()).route(
        "/",
        web::get().to(|session: Session| async move {
            session.insert("k", 1).expect("insert");
            HttpResponse::Ok().finish()
        }),
    ))
    .await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
}
