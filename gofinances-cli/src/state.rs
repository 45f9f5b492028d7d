//! Local state under ~/.gofinances: the signed-in user's session.
//!
//! This is the identity boundary for the CLI. The rest of the app only ever
//! needs `user.id`, which namespaces the transaction store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `$GOFINANCES_HOME`, else `$HOME/.gofinances`
pub fn gofinances_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("GOFINANCES_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".gofinances"))
}

pub fn ensure_gofinances_home() -> Result<PathBuf> {
    let dir = gofinances_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub signed_in_at_utc: String,
}

pub fn session_path(home: &Path) -> PathBuf {
    home.join("profile.json")
}

/// `None` when nobody is signed in
pub fn read_session(home: &Path) -> Result<Option<Session>> {
    let p = session_path(home);
    let s = match fs::read_to_string(&p) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", p.display())),
    };
    let session = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(session))
}

pub fn write_session(home: &Path, session: &Session) -> Result<()> {
    let p = session_path(home);
    let json = serde_json::to_string_pretty(session)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Returns the user that was signed out, if any
pub fn sign_out(home: &Path) -> Result<Option<User>> {
    let Some(session) = read_session(home)? else {
        return Ok(None);
    };
    let p = session_path(home);
    fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    Ok(Some(session.user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user: User {
                id: "google-oauth2|123".into(),
                name: "Bruno".into(),
                photo: Some("https://github.com/bprinzo.png".into()),
            },
            signed_in_at_utc: "2023-04-10T12:00:00+00:00".into(),
        }
    }

    #[test]
    fn test_session_roundtrip_and_sign_out() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_session(dir.path()).unwrap(), None);

        write_session(dir.path(), &session()).unwrap();
        assert_eq!(read_session(dir.path()).unwrap(), Some(session()));

        let user = sign_out(dir.path()).unwrap().unwrap();
        assert_eq!(user.name, "Bruno");
        assert_eq!(read_session(dir.path()).unwrap(), None);
        assert_eq!(sign_out(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_photo_is_optional() {
        let parsed: Session = serde_json::from_str(
            r#"{ "user": { "id": "1", "name": "Ana" }, "signed_in_at_utc": "now" }"#,
        )
        .unwrap();
        assert_eq!(parsed.user.photo, None);
    }
}
