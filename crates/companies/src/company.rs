use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jobboard_auth::{Role, Viewer};
use jobboard_core::{CompanyId, DomainError, DomainResult, Email, Entity, PhoneNumber, UserId, Website};

/// Company status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Active,
    Disabled,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "active",
            CompanyStatus::Disabled => "disabled",
        }
    }
}

/// A recruiter's company profile.
///
/// # Invariants
/// - `name` is unique across companies (enforced by the store).
/// - A recruiter owns at most one company (`created_by` unique, enforced by the store).
/// - Status moves active→disabled (owner or admin) and disabled→active (admin only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub website: Website,
    pub description: String,
    pub industry: String,
    pub size: String,
    pub location: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub logo: Option<String>,
    pub created_by: UserId,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
}

/// Command: register a company for the calling recruiter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterCompany {
    pub company_name: String,
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub location: String,
    pub email: String,
    pub phone: String,
}

impl Company {
    pub fn register(
        cmd: RegisterCompany,
        owner: UserId,
        logo: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        DomainError::require("companyName", &cmd.company_name)?;
        DomainError::require("website", &cmd.website)?;
        DomainError::require("email", &cmd.email)?;
        DomainError::require("phone", &cmd.phone)?;

        Ok(Self {
            id: CompanyId::new(),
            name: cmd.company_name.trim().to_string(),
            website: Website::parse(&cmd.website)?,
            description: cmd.description.trim().to_string(),
            industry: cmd.industry.trim().to_string(),
            size: cmd.size.trim().to_string(),
            location: cmd.location.trim().to_string(),
            email: Email::parse(&cmd.email)?,
            phone: PhoneNumber::parse(&cmd.phone)?,
            logo,
            created_by: owner,
            status: CompanyStatus::Active,
            created_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }

    /// Move `from` → `to`; anything else means the company is not in a state
    /// the caller can act on, which reads as "not found".
    pub fn transition(&mut self, from: CompanyStatus, to: CompanyStatus) -> DomainResult<()> {
        if self.status != from {
            return Err(DomainError::not_found(format!("{} company", from.as_str())));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Allow-listed company update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyPatch {
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(skip)]
    pub logo: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == CompanyPatch::default()
    }

    /// Validate every present field without touching any company.
    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("no company fields to update"));
        }
        if let Some(name) = &self.company_name {
            DomainError::require("companyName", name)?;
        }
        if let Some(website) = &self.website {
            Website::parse(website)?;
        }
        if let Some(email) = &self.email {
            Email::parse(email)?;
        }
        if let Some(phone) = &self.phone {
            PhoneNumber::parse(phone)?;
        }
        Ok(())
    }

    /// Validate, then write every present field onto `company`.
    pub fn apply(&self, company: &mut Company) -> DomainResult<()> {
        self.validate()?;

        if let Some(name) = &self.company_name {
            company.name = name.trim().to_string();
        }
        if let Some(website) = &self.website {
            company.website = Website::parse(website)?;
        }
        if let Some(description) = &self.description {
            company.description = description.trim().to_string();
        }
        if let Some(industry) = &self.industry {
            company.industry = industry.trim().to_string();
        }
        if let Some(size) = &self.size {
            company.size = size.trim().to_string();
        }
        if let Some(location) = &self.location {
            company.location = location.trim().to_string();
        }
        if let Some(email) = &self.email {
            company.email = Email::parse(email)?;
        }
        if let Some(phone) = &self.phone {
            company.phone = PhoneNumber::parse(phone)?;
        }
        if let Some(logo) = &self.logo {
            company.logo = Some(logo.clone());
        }
        Ok(())
    }
}

/// Which companies a viewer's listing contains.
///
/// Anonymous (or unrecognized-role) viewers see every company, jobseekers
/// only active ones, recruiters only their own, admins everything.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompanyFilter {
    All,
    ActiveOnly,
    OwnedBy(UserId),
}

impl CompanyFilter {
    pub fn for_viewer(viewer: &Viewer) -> Self {
        match viewer.actor() {
            None => CompanyFilter::All,
            Some(actor) => match actor.role {
                Role::Admin => CompanyFilter::All,
                Role::Jobseeker => CompanyFilter::ActiveOnly,
                Role::Recruiter => CompanyFilter::OwnedBy(actor.id),
            },
        }
    }

    pub fn matches(&self, company: &Company) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::ActiveOnly => company.is_active(),
            CompanyFilter::OwnedBy(owner) => company.created_by == *owner,
        }
    }
}
