//! One-shot notices carried across a redirect in a short-lived cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::presentation::views::FlashView;

pub(super) const FLASH_COOKIE: &str = "bulletin_flash";
const FLASH_TTL_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    fn tag(self) -> char {
        match self {
            FlashKind::Success => 's',
            FlashKind::Error => 'e',
        }
    }

    fn from_tag(tag: char) -> Option<Self> {
        match tag {
            's' => Some(FlashKind::Success),
            'e' => Some(FlashKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    fn encode(&self) -> String {
        let mut raw = String::with_capacity(self.message.len() + 2);
        raw.push(self.kind.tag());
        raw.push(':');
        raw.push_str(&self.message);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value.as_bytes()).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        let mut chars = raw.chars();
        let kind = FlashKind::from_tag(chars.next()?)?;
        let message = chars.as_str().strip_prefix(':')?;
        if message.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            message: message.to_string(),
        })
    }
}

impl From<Flash> for FlashView {
    fn from(flash: Flash) -> Self {
        Self {
            kind: flash.kind.as_str(),
            message: flash.message,
        }
    }
}

/// Queue `flash` for the next rendered page.
pub(super) fn set_flash(jar: CookieJar, flash: &Flash) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, flash.encode()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(FLASH_TTL_SECONDS));
    jar.add(cookie)
}

/// Read and clear the pending flash, if any.
pub(super) fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(value) = jar.get(FLASH_COOKIE).map(|cookie| cookie.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, Flash::decode(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_survives_the_cookie_value() {
        let jar = set_flash(CookieJar::new(), &Flash::success("Messages deleted: 3"));
        let (_, flash) = take_flash(jar);
        assert_eq!(flash, Some(Flash::success("Messages deleted: 3")));
    }

    #[test]
    fn taking_a_flash_clears_it() {
        let jar = set_flash(CookieJar::new(), &Flash::error("Something failed"));
        let (jar, _) = take_flash(jar);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn tampered_values_are_dropped() {
        assert_eq!(Flash::decode("%%%"), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("x:hello")), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("s:")), None);
    }

    #[test]
    fn missing_cookie_yields_nothing() {
        let (_, flash) = take_flash(CookieJar::new());
        assert!(flash.is_none());
    }
}
