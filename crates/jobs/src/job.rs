use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobboard_core::{ApplicationId, CompanyId, DomainError, DomainResult, Entity, JobId, UserId};

/// Employment type of a posting.
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
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl FromStr for JobType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-time" | "fulltime" | "full time" => Ok(JobType::FullTime),
            "part-time" | "parttime" | "part time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            other => Err(DomainError::validation(format!("unknown job type: {other}"))),
        }
    }
}

/// Posting lifecycle. Only `Open` and `Disabled` are ever reached through
/// the catalog's operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Open,
    Closed,
    #[serde(rename = "In Progress")]
    InProgress,
    Disabled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
            JobStatus::InProgress => "In Progress",
            JobStatus::Disabled => "Disabled",
        }
    }
}

/// A job posting.
///
/// # Invariants
/// - `salary > 0` and `positions > 0`.
/// - `company` resolved to an existing company when the job was posted.
/// - `applications` holds exactly the ids of applications whose `job` is this
///   job; the store appends to it in the same transaction that creates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub job_type: JobType,
    pub location: String,
    pub description: String,
    pub responsibilities: String,
    pub qualifications: String,
    pub salary: f64,
    pub niche: String,
    pub industry: String,
    pub positions: u32,
    pub company_name: String,
    pub created_by: UserId,
    pub company: CompanyId,
    pub status: JobStatus,
    pub applications: Vec<ApplicationId>,
    pub created_at: DateTime<Utc>,
}

/// Command: post a job. `company_id` is optional for recruiters (their own
/// company is looked up) and required for admins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostJob {
    pub title: String,
    pub job_type: String,
    pub location: String,
    pub description: String,
    pub responsibilities: String,
    pub qualifications: String,
    pub salary: f64,
    pub niche: String,
    pub industry: String,
    pub company_name: String,
    pub positions: i64,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

fn check_salary(salary: f64) -> DomainResult<f64> {
    if !salary.is_finite() || salary <= 0.0 {
        return Err(DomainError::validation("salary must be a positive number"));
    }
    Ok(salary)
}

fn check_positions(positions: i64) -> DomainResult<u32> {
    if positions <= 0 {
        return Err(DomainError::validation("positions must be a positive integer"));
    }
    u32::try_from(positions).map_err(|_| DomainError::validation("positions is out of range"))
}

impl Job {
    /// Build an open job under an already-resolved company.
    pub fn post(cmd: PostJob, company: CompanyId, posted_by: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        for (field, value) in [
            ("title", &cmd.title),
            ("jobType", &cmd.job_type),
            ("location", &cmd.location),
            ("description", &cmd.description),
            ("responsibilities", &cmd.responsibilities),
            ("qualifications", &cmd.qualifications),
            ("niche", &cmd.niche),
            ("industry", &cmd.industry),
            ("companyName", &cmd.company_name),
        ] {
            DomainError::require(field, value)?;
        }

        Ok(Self {
            id: JobId::new(),
            title: cmd.title.trim().to_string(),
            job_type: cmd.job_type.parse()?,
            location: cmd.location.trim().to_string(),
            description: cmd.description.trim().to_string(),
            responsibilities: cmd.responsibilities.trim().to_string(),
            qualifications: cmd.qualifications.trim().to_string(),
            salary: check_salary(cmd.salary)?,
            niche: cmd.niche.trim().to_string(),
            industry: cmd.industry.trim().to_string(),
            positions: check_positions(cmd.positions)?,
            company_name: cmd.company_name.trim().to_string(),
            created_by: posted_by,
            company,
            status: JobStatus::Open,
            applications: Vec::new(),
            created_at: now,
        })
    }

    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }

    /// Move `from` → `to`; a job in any other state is treated as not found.
    pub fn transition(&mut self, from: JobStatus, to: JobStatus) -> DomainResult<()> {
        if self.status != from {
            return Err(DomainError::not_found(format!("{} job", from.as_str().to_lowercase())));
        }
        self.status = to;
        Ok(())
    }

    /// Case-insensitive substring match on title or description; a blank
    /// keyword matches everything.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        keyword.is_empty()
            || self.title.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
    }

    /// Record a new application. Idempotent per id.
    pub fn attach_application(&mut self, application: ApplicationId) {
        if !self.applications.contains(&application) {
            self.applications.push(application);
        }
    }
}

impl Entity for Job {
    type Id = JobId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Allow-listed job edit. Status, ownership and company links are not
/// editable here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    pub title: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub responsibilities: Option<String>,
    pub qualifications: Option<String>,
    pub salary: Option<f64>,
    pub niche: Option<String>,
    pub industry: Option<String>,
    pub positions: Option<i64>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        *self == JobPatch::default()
    }

    /// Validate the whole patch, then write it; a rejected patch leaves the
    /// job untouched.
    pub fn apply(&self, job: &mut Job) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("no job fields to update"));
        }

        let text_fields = [
            ("title", &self.title),
            ("location", &self.location),
            ("description", &self.description),
            ("responsibilities", &self.responsibilities),
            ("qualifications", &self.qualifications),
            ("niche", &self.niche),
            ("industry", &self.industry),
        ];
        for (field, value) in text_fields {
            if let Some(value) = value {
                DomainError::require(field, value)?;
            }
        }
        let job_type = self.job_type.as_deref().map(str::parse::<JobType>).transpose()?;
        let salary = self.salary.map(check_salary).transpose()?;
        let positions = self.positions.map(check_positions).transpose()?;

        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.trim().to_string();
            }
        };
        set(&mut job.title, &self.title);
        set(&mut job.location, &self.location);
        set(&mut job.description, &self.description);
        set(&mut job.responsibilities, &self.responsibilities);
        set(&mut job.qualifications, &self.qualifications);
        set(&mut job.niche, &self.niche);
        set(&mut job.industry, &self.industry);
        if let Some(job_type) = job_type {
            job.job_type = job_type;
        }
        if let Some(salary) = salary {
            job.salary = salary;
        }
        if let Some(positions) = positions {
            job.positions = positions;
        }
        Ok(())
    }
}
