use std::fmt;
use std::str::FromStr;

use crate::error::{GiftError, Result};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Label used when talking to the model.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = GiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "男" | "male" | "m" => Ok(Gender::Male),
            "女" | "female" | "f" => Ok(Gender::Female),
            other => Err(GiftError::invalid_profile(format!(
                "unknown gender '{other}', expected 男 or 女"
            ))),
        }
    }
}

/// Recipient attributes for one generation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    gender: Gender,
    age: u8,
    interests: Option<String>,
    budget_min: u32,
    budget_max: u32,
}

impl Profile {
    pub fn new(
        gender: Gender,
        age: u8,
        interests: Option<String>,
        budget_min: u32,
        budget_max: u32,
    ) -> Result<Profile> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(GiftError::invalid_profile(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}, got {age}"
            )));
        }
        if budget_max < budget_min {
            return Err(GiftError::invalid_profile("最高预算必须大于最低预算"));
        }
        let interests = interests
            .map(|i| i.trim().to_owned())
            .filter(|i| !i.is_empty());

        Ok(Profile {
            gender,
            age,
            interests,
            budget_min,
            budget_max,
        })
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }
    pub fn age(&self) -> u8 {
        self.age
    }
    pub fn interests(&self) -> Option<&str> {
        self.interests.as_deref()
    }
    pub fn budget_min(&self) -> u32 {
        self.budget_min
    }
    pub fn budget_max(&self) -> u32 {
        self.budget_max
    }
}
