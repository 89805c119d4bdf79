//! Response messages in the supported languages.
//!
//! Lookups are pure: a request resolves its [`Locale`] once from
//! `Accept-Language` and every message is looked up against it, so concurrent
//! requests in different languages never observe each other's messages.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts, HeaderMap},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    /// Picks the first language tag of an `Accept-Language` value.
    /// `id`, `id-ID` and `id;q=0.9` all select Indonesian.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(',')
            .next()
            .unwrap_or_default()
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        let lang = primary.split(['-', '_']).next().unwrap_or_default();
        if lang.eq_ignore_ascii_case("id") {
            Locale::Id
        } else {
            Locale::En
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(Self::from_tag)
            .unwrap_or_default()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_headers(&parts.headers))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    Success,
    InternalError,
    FailedDecodeJson,
    Unauthorized,
    NotFound,
    WrongPassword,
    AlreadyExists,
    MustAbove18,
    PasswordInvalid,
    // field rules; `{min}`/`{max}` are filled in by the caller
    Required,
    LengthBetween,
    InvalidEmail,
    InvalidSex,
    InvalidDate,
}

pub fn localize(key: MessageKey, locale: Locale) -> &'static str {
    use MessageKey::*;
    match locale {
        Locale::En => match key {
            Success => "Success",
            InternalError => "Internal server error",
            FailedDecodeJson => "Failed to decode JSON",
            Unauthorized => "Unauthorized",
            NotFound => "User not found",
            WrongPassword => "Wrong password",
            AlreadyExists => "User already exists",
            MustAbove18 => "Age must above 18",
            PasswordInvalid => "Minimum eight characters, at least one uppercase letter, one lowercase letter, one number, and one special character",
            Required => "cannot be blank",
            LengthBetween => "the length must be between {min} and {max}",
            InvalidEmail => "must be a valid email address",
            InvalidSex => "must be a valid value",
            InvalidDate => "must be a valid date",
        },
        Locale::Id => match key {
            Success => "Sukses",
            InternalError => "Terjadi kegagalan pada server",
            FailedDecodeJson => "Gagal membaca JSON",
            Unauthorized => "Tidak memiliki akses",
            NotFound => "User tidak ditemukan",
            WrongPassword => "Password salah",
            AlreadyExists => "User sudah pernah dibuat",
            MustAbove18 => "Umur harus di atas 18 tahun",
            PasswordInvalid => "Minimum 8 karakter, satu huruf kapital, satu huruf kecil, satu angka, dan satu karakter spesial",
            Required => "tidak boleh kosong",
            LengthBetween => "panjang harus antara {min} dan {max}",
            InvalidEmail => "harus berupa alamat email yang valid",
            InvalidSex => "harus berupa nilai yang valid",
            InvalidDate => "harus berupa tanggal yang valid",
        },
    }
}
