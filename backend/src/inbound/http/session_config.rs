//! Cookie-session settings read from the environment.
//!
//! | Variable                  | Release build          | Debug build                     |
//! |---------------------------|------------------------|---------------------------------|
//! | `SESSION_KEY_FILE`        | key file, >= 64 bytes  | random key if missing or < 32 B |
//! | `SESSION_COOKIE_SECURE`   | required               | defaults to secure              |
//! | `SESSION_SAMESITE`        | required               | defaults to `Lax`               |
//! | `SESSION_ALLOW_EPHEMERAL` | required, must be off  | defaults to off                 |
//!
//! Values are read through [`mockable::Env`] so every rule can be exercised
//! without touching the process environment.

use std::path::PathBuf;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub(crate) const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub(crate) const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key material accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest key material a cookie key can be derived from.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Whether missing or invalid settings fall back to defaults.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Fall back to defaults with a warning.
    Debug,
    /// Reject missing or invalid settings.
    Release,
}

impl BuildMode {
    /// `Debug` when compiled with debug assertions.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn lenient(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie-session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether the cookie carries the `Secure` flag.
    pub cookie_secure: bool,
    /// `SameSite` policy of the cookie.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Private, HTTP-only cookie session expiring after two hours.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Reasons the session settings are unusable.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required variable is unset.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable holds an unrecognised value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The key file could not be read.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file holds too little key material.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` without the `Secure` flag.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys were requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session settings.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use recipe_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug settings");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.lenient() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = session_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Parse a boolean toggle. Lenient builds substitute `default` for missing
/// or unparseable values.
fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        if mode.lenient() {
            warn!(variable = name, default, "session toggle not set; using default");
            return Ok(default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&value) {
        Some(parsed) => Ok(parsed),
        None if mode.lenient() => {
            warn!(variable = name, value = %value, default, "invalid session toggle; using default");
            Ok(default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let Some(value) = env.string(SAMESITE_ENV) else {
        if mode.lenient() {
            warn!(variable = SAMESITE_ENV, "SameSite not set; using Lax");
            return Ok(SameSite::Lax);
        }
        return Err(SessionConfigError::MissingEnv { name: SAMESITE_ENV });
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.lenient() => {
            warn!("SameSite=None without a secure cookie; browsers may drop the session");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.lenient() => {
            warn!(value = %value, "invalid SameSite policy; using Lax");
            Ok(SameSite::Lax)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            value,
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(error) if mode.lenient() || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using an ephemeral session key");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let length = bytes.len();
    let result = if !mode.lenient() && length < SESSION_KEY_MIN_LEN {
        Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: SESSION_KEY_MIN_LEN,
        })
    } else if length < SESSION_KEY_DERIVE_MIN_LEN {
        warn!(
            path = %path.display(),
            length,
            min_len = SESSION_KEY_DERIVE_MIN_LEN,
            "session key too short to derive from; using an ephemeral key"
        );
        Ok(Key::generate())
    } else {
        Ok(Key::derive_from(&bytes))
    };
    bytes.zeroize();
    result
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
