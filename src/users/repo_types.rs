use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

// Birthdates travel as `YYYY-MM-DD` both ways.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(()),
        }
    }
}

/// Row as stored in `users`.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub sex: String,
    pub birthdate: Date,
    pub verified: bool,
    pub created_at: OffsetDateTime,
}

/// User record.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String, // PHC string, never exposed in JSON
    pub sex: Sex,
    #[serde(with = "iso_date")]
    pub birthdate: Date,
    pub verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let sex = r
            .sex
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown sex {:?} for user {}", r.sex, r.uid))?;
        Ok(Self {
            uid: r.uid,
            name: r.name,
            email: r.email,
            username: r.username,
            hashed_password: r.hashed_password,
            sex,
            birthdate: r.birthdate,
            verified: r.verified,
            created_at: r.created_at,
        })
    }
}

/// Everything needed to insert a user; the store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub sex: Sex,
    pub birthdate: Date,
}
