//! Shared domain enumerations aligned with persisted column values.
//!
//! Status columns are stored as `SMALLINT` codes and categorical columns as
//! `TEXT`; these types validate incoming values before they reach storage.

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareerStatus {
    Active,
    Inactive,
    Draft,
}

impl CareerStatus {
    pub fn code(self) -> i16 {
        match self {
            CareerStatus::Active => 1,
            CareerStatus::Inactive => 2,
            CareerStatus::Draft => 3,
        }
    }
}

impl TryFrom<i16> for CareerStatus {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CareerStatus::Active),
            2 => Ok(CareerStatus::Inactive),
            3 => Ok(CareerStatus::Draft),
            other => Err(DomainError::validation(format!(
                "`status` must be 1 (active), 2 (inactive) or 3 (draft), got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogStatus {
    Published,
    Draft,
    Archived,
}

impl BlogStatus {
    pub fn code(self) -> i16 {
        match self {
            BlogStatus::Published => 1,
            BlogStatus::Draft => 2,
            BlogStatus::Archived => 3,
        }
    }
}

impl TryFrom<i16> for BlogStatus {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BlogStatus::Published),
            2 => Ok(BlogStatus::Draft),
            3 => Ok(BlogStatus::Archived),
            other => Err(DomainError::validation(format!(
                "`status` must be 1 (published), 2 (draft) or 3 (archived), got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FranchiseStatus {
    New,
    Contacted,
    InDiscussion,
    Approved,
    Rejected,
}

impl FranchiseStatus {
    pub fn code(self) -> i16 {
        match self {
            FranchiseStatus::New => 1,
            FranchiseStatus::Contacted => 2,
            FranchiseStatus::InDiscussion => 3,
            FranchiseStatus::Approved => 4,
            FranchiseStatus::Rejected => 5,
        }
    }
}

impl TryFrom<i16> for FranchiseStatus {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FranchiseStatus::New),
            2 => Ok(FranchiseStatus::Contacted),
            3 => Ok(FranchiseStatus::InDiscussion),
            4 => Ok(FranchiseStatus::Approved),
            5 => Ok(FranchiseStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "`status` must be between 1 and 5, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Full-time" => Ok(JobType::FullTime),
            "Part-time" => Ok(JobType::PartTime),
            "Contract" => Ok(JobType::Contract),
            "Internship" => Ok(JobType::Internship),
            other => Err(DomainError::validation(format!(
                "`job_type` must be one of Full-time, Part-time, Contract, Internship; got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Executive => "Executive",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Entry" => Ok(ExperienceLevel::Entry),
            "Mid" => Ok(ExperienceLevel::Mid),
            "Senior" => Ok(ExperienceLevel::Senior),
            "Executive" => Ok(ExperienceLevel::Executive),
            other => Err(DomainError::validation(format!(
                "`experience_level` must be one of Entry, Mid, Senior, Executive; got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "others",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "others" => Ok(Gender::Others),
            other => Err(DomainError::validation(format!(
                "`gender` must be one of Male, Female, others; got `{other}`"
            ))),
        }
    }
}

/// How a subscription discount was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    Percentage,
    Fixed,
    Trial,
}

impl DiscountType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
            DiscountType::Trial => "trial",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            "trial" => Ok(DiscountType::Trial),
            other => Err(DomainError::validation(format!(
                "`discount_type` must be one of percentage, fixed, trial; got `{other}`"
            ))),
        }
    }
}
