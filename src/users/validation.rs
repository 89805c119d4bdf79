use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date};

use super::{
    dto::{CreateUserRequest, LoginRequest},
    repo_types::Sex,
};
use crate::i18n::{localize, Locale, MessageKey};

pub const MIN_AGE: i32 = 18;
/// Longest address a mailbox can have; also fits the `users.email` column.
const EMAIL_MAX_LEN: usize = 254;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Length { min: usize, max: usize },
    Email,
    Password,
    Sex,
    Date,
    MustAbove18,
}

/// First rule a payload broke, tagged with the JSON field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub rule: Rule,
}

impl ValidationError {
    fn new(field: &'static str, rule: Rule) -> Self {
        Self { field, rule }
    }

    pub fn message(&self, locale: Locale) -> String {
        let text = match self.rule {
            Rule::Required => localize(MessageKey::Required, locale).to_owned(),
            Rule::Length { min, max } => localize(MessageKey::LengthBetween, locale)
                .replace("{min}", &min.to_string())
                .replace("{max}", &max.to_string()),
            Rule::Email => localize(MessageKey::InvalidEmail, locale).to_owned(),
            Rule::Password => localize(MessageKey::PasswordInvalid, locale).to_owned(),
            Rule::Sex => localize(MessageKey::InvalidSex, locale).to_owned(),
            Rule::Date => localize(MessageKey::InvalidDate, locale).to_owned(),
            Rule::MustAbove18 => localize(MessageKey::MustAbove18, locale).to_owned(),
        };
        format!("{}: {}", self.field, text)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(Locale::En))
    }
}

impl std::error::Error for ValidationError {}

/// A registration payload that passed validation, birthdate already parsed.
#[derive(Debug, Clone)]
pub struct NewUserInput {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub sex: Sex,
    pub birthdate: Date,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// At least eight characters from `[A-Za-z0-9@$!%*?&]` with one of each class.
pub(crate) fn is_valid_password(password: &str) -> bool {
    lazy_static! {
        static ref CHARSET_RE: Regex = Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").unwrap();
    }
    CHARSET_RE.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn parse_birthdate(s: &str) -> Option<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).ok()
}

/// Whole years between `birthdate` and `today`: the calendar-year difference,
/// less one while this year's birthday is still ahead.
pub fn age_on(birthdate: Date, today: Date) -> i32 {
    let mut age = today.year() - birthdate.year();
    if (today.month() as u8, today.day()) < (birthdate.month() as u8, birthdate.day()) {
        age -= 1;
    }
    age
}

pub fn is_adult(birthdate: Date, today: Date) -> bool {
    age_on(birthdate, today) >= MIN_AGE
}

fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, Rule::Required));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::new(field, Rule::Length { min, max }));
    }
    Ok(())
}

/// Validates a registration payload as of `today`.
///
/// The age rule runs before the per-field rules, so an underage applicant
/// hears about their age first; the remaining fields are checked in order and
/// the first failure wins.
pub fn validate_create(req: CreateUserRequest, today: Date) -> Result<NewUserInput, ValidationError> {
    let birthdate = parse_birthdate(&req.birthdate);
    if let Some(date) = birthdate {
        if !is_adult(date, today) {
            return Err(ValidationError::new("birthdate", Rule::MustAbove18));
        }
    }

    check_length("name", &req.name, 3, 50)?;

    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::new("email", Rule::Required));
    }
    if !is_valid_email(&email) {
        return Err(ValidationError::new("email", Rule::Email));
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(ValidationError::new(
            "email",
            Rule::Length {
                min: 1,
                max: EMAIL_MAX_LEN,
            },
        ));
    }

    check_length("username", &req.username, 5, 30)?;

    if req.password.is_empty() {
        return Err(ValidationError::new("password", Rule::Required));
    }
    if !is_valid_password(&req.password) {
        return Err(ValidationError::new("password", Rule::Password));
    }

    if req.sex.is_empty() {
        return Err(ValidationError::new("sex", Rule::Required));
    }
    let sex: Sex = req
        .sex
        .parse()
        .map_err(|_| ValidationError::new("sex", Rule::Sex))?;

    if req.birthdate.is_empty() {
        return Err(ValidationError::new("birthdate", Rule::Required));
    }
    let birthdate = birthdate.ok_or(ValidationError::new("birthdate", Rule::Date))?;

    Ok(NewUserInput {
        name: req.name,
        email,
        username: req.username,
        password: req.password,
        sex,
        birthdate,
    })
}

pub fn validate_login(req: LoginRequest) -> Result<LoginInput, ValidationError> {
    if req.username.is_empty() {
        return Err(ValidationError::new("username", Rule::Required));
    }
    if req.password.is_empty() {
        return Err(ValidationError::new("password", Rule::Required));
    }
    Ok(LoginInput {
        username: req.username,
        password: req.password,
    })
}
