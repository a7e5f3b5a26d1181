// ── Browser-style cookie storage ──
//
// `CookieJar` behaves like `document.cookie` for a single origin: values
// are stored component-encoded with an absolute expiry, `get` scans the
// live `name=value; name=value` string, and deleting writes an expiry in
// the past. The stores wrap a jar in memory or in a file so the CLI and
// TUI keep the guest between runs.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::{debug, warn};

use crate::error::CoreError;

/// Bytes `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// `Expires` attribute format (RFC 7231 IMF-fixdate).
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

const JAR_HEADER: &str = "# concierge cookie jar";

/// Longest cookie lifetime in days. Longer requests are capped.
pub const MAX_COOKIE_DAYS: u32 = 3650;

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decode a component-encoded value. Invalid UTF-8 is replaced, never an error.
pub fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

// ── Cookie ───────────────────────────────────────────────────────────

/// A single stored cookie. `value` is kept encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
    pub path: String,
}

impl Cookie {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// `name=value; expires=<HTTP-date>; path=/`
    pub fn to_set_cookie(&self) -> String {
        format!(
            "{}={}; expires={}; path={}",
            self.name,
            self.value,
            self.expires.format(HTTP_DATE),
            self.path
        )
    }

    /// Parse a line written by [`to_set_cookie`](Self::to_set_cookie).
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split("; ");
        let (name, value) = parts.next()?.split_once('=')?;
        let mut expires = None;
        let mut path = "/".to_owned();

        for attr in parts {
            match attr.split_once('=') {
                Some(("expires", date)) => {
                    expires = NaiveDateTime::parse_from_str(date, HTTP_DATE)
                        .ok()
                        .map(|naive| naive.and_utc());
                }
                Some(("path", p)) => p.clone_into(&mut path),
                _ => {}
            }
        }

        Some(Self {
            name: name.to_owned(),
            value: value.to_owned(),
            expires: expires?,
            path,
        })
    }
}

// ── Jar ──────────────────────────────────────────────────────────────

/// Cookies for one origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name` for `days` days from `now`.
    ///
    /// Replaces any cookie with the same name and path. `days` is capped
    /// at [`MAX_COOKIE_DAYS`].
    pub fn set(&mut self, name: &str, value: &str, days: u32, now: DateTime<Utc>) {
        let lifetime = TimeDelta::days(i64::from(days.min(MAX_COOKIE_DAYS)));
        let cookie = Cookie {
            name: name.to_owned(),
            value: encode_component(value),
            expires: now.checked_add_signed(lifetime).unwrap_or(now),
            path: "/".to_owned(),
        };
        self.store(cookie, now);
    }

    /// Expire `name` by writing it with an expiry at the Unix epoch.
    pub fn delete(&mut self, name: &str, now: DateTime<Utc>) {
        let cookie = Cookie {
            name: name.to_owned(),
            value: String::new(),
            expires: DateTime::<Utc>::UNIX_EPOCH,
            path: "/".to_owned(),
        };
        self.store(cookie, now);
    }

    /// Decoded value of `name`, or `""` when absent or expired.
    pub fn get(&self, name: &str, now: DateTime<Utc>) -> String {
        self.document_cookie(now)
            .split("; ")
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == name)
            .last()
            .map(|(_, value)| decode_component(value))
            .unwrap_or_default()
    }

    /// Live cookies as a `document.cookie` string.
    pub fn document_cookie(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|c| !c.is_expired(now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|c| !c.is_expired(now));
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    /// Parse the file format: one `Set-Cookie`-style line per cookie.
    /// Blank lines, `#` comments, and unparseable lines are skipped.
    pub fn parse(text: &str) -> Self {
        let cookies = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let cookie = Cookie::parse(line);
                if cookie.is_none() {
                    warn!(line, "skipping unreadable cookie line");
                }
                cookie
            })
            .collect();
        Self { cookies }
    }

    pub fn serialize(&self) -> String {
        let mut out = String::from(JAR_HEADER);
        out.push('\n');
        for cookie in &self.cookies {
            let _ = writeln!(out, "{}", cookie.to_set_cookie());
        }
        out
    }

    fn store(&mut self, cookie: Cookie, now: DateTime<Utc>) {
        self.cookies
            .retain(|c| !(c.name == cookie.name && c.path == cookie.path));
        self.cookies.push(cookie);
        self.prune(now);
    }
}

// ── Stores ───────────────────────────────────────────────────────────

/// Browser-style cookie access used by the guest session.
pub trait CookieStore: Send + Sync {
    /// Store `value` for `days` days.
    fn set(&self, name: &str, value: &str, days: u32) -> Result<(), CoreError>;

    /// The decoded value, or `""` when there is no live cookie.
    fn get(&self, name: &str) -> String;

    fn delete(&self, name: &str) -> Result<(), CoreError>;
}

/// A jar that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    jar: Mutex<CookieJar>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jar(jar: CookieJar) -> Self {
        Self {
            jar: Mutex::new(jar),
        }
    }

    /// A copy of the current jar contents.
    pub fn jar(&self) -> CookieJar {
        lock(&self.jar).clone()
    }
}

impl CookieStore for MemoryCookieStore {
    fn set(&self, name: &str, value: &str, days: u32) -> Result<(), CoreError> {
        lock(&self.jar).set(name, value, days, Utc::now());
        Ok(())
    }

    fn get(&self, name: &str) -> String {
        lock(&self.jar).get(name, Utc::now())
    }

    fn delete(&self, name: &str) -> Result<(), CoreError> {
        lock(&self.jar).delete(name, Utc::now());
        Ok(())
    }
}

/// A jar persisted to a text file after every write.
#[derive(Debug)]
pub struct FileCookieStore {
    path: PathBuf,
    jar: Mutex<CookieJar>,
}

impl FileCookieStore {
    /// Load the jar at `path`. A missing file is an empty jar.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let jar = match std::fs::read_to_string(&path) {
            Ok(text) => {
                let mut jar = CookieJar::parse(&text);
                jar.prune(Utc::now());
                jar
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CookieJar::new(),
            Err(e) => return Err(storage_error(&path, &e)),
        };
        debug!(path = %path.display(), "cookie jar loaded");
        Ok(Self {
            path,
            jar: Mutex::new(jar),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, jar: &CookieJar) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| storage_error(&self.path, &e))?;
        }
        std::fs::write(&self.path, jar.serialize()).map_err(|e| storage_error(&self.path, &e))
    }
}

impl CookieStore for FileCookieStore {
    fn set(&self, name: &str, value: &str, days: u32) -> Result<(), CoreError> {
        let mut jar = lock(&self.jar);
        jar.set(name, value, days, Utc::now());
        self.persist(&jar)
    }

    fn get(&self, name: &str) -> String {
        lock(&self.jar).get(name, Utc::now())
    }

    fn delete(&self, name: &str) -> Result<(), CoreError> {
        let mut jar = lock(&self.jar);
        jar.delete(name, Utc::now());
        self.persist(&jar)
    }
}

fn lock(jar: &Mutex<CookieJar>) -> MutexGuard<'_, CookieJar> {
    jar.lock().unwrap_or_else(PoisonError::into_inner)
}

fn storage_error(path: &Path, err: &std::io::Error) -> CoreError {
    CoreError::CookieStorage {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
