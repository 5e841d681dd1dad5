use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use jobboard_core::{CompanyId, DomainError, DomainResult, Email, PhoneNumber};

use crate::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(DomainError::validation(format!("unknown gender '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Education {
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Experience {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Profile sub-record of an actor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub bio: Option<String>,
    /// Insertion-ordered set: duplicates are dropped case-insensitively.
    pub skills: Vec<String>,
    pub resume: Option<String>,
    pub resume_original_name: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub company: Option<CompanyId>,
    pub profile_photo: Option<String>,
}

/// One reason a profile is not ready for applying to jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileGap {
    Skills,
    Resume,
    Education,
    Gender,
}

impl ProfileGap {
    pub fn reason(&self) -> &'static str {
        match self {
            ProfileGap::Skills => "add at least one skill to your profile",
            ProfileGap::Resume => "upload a resume",
            ProfileGap::Education => "add at least one education entry with a degree",
            ProfileGap::Gender => "specify your gender",
        }
    }
}

/// The apply-flow precheck: which required profile parts are missing.
pub fn check_profile_completeness(profile: &Profile) -> Result<(), Vec<ProfileGap>> {
    let mut gaps = Vec::new();
    if profile.skills.iter().all(|s| s.trim().is_empty()) {
        gaps.push(ProfileGap::Skills);
    }
    if profile.resume.as_deref().is_none_or(|r| r.trim().is_empty()) {
        gaps.push(ProfileGap::Resume);
    }
    if !profile.education.iter().any(|e| !e.degree.trim().is_empty()) {
        gaps.push(ProfileGap::Education);
    }
    if profile.gender.is_none() {
        gaps.push(ProfileGap::Gender);
    }

    if gaps.is_empty() { Ok(()) } else { Err(gaps) }
}

/// Split a comma-separated skills field into an ordered, de-duplicated set.
pub fn parse_skills(raw: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.to_string());
        }
    }
    skills
}

/// Allow-listed profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub resume: Option<(String, String)>,
    pub profile_photo: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }

    /// Validate and write every present field onto `user`.
    ///
    /// Nothing is written if any field fails validation.
    pub fn apply_to(self, user: &mut User) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("no profile fields to update"));
        }

        let email = self.email.as_deref().map(Email::parse).transpose()?;
        let phone = self.phone_number.as_deref().map(PhoneNumber::parse).transpose()?;
        if let Some(name) = &self.fullname {
            DomainError::require("fullname", name)?;
        }
        if let Some(education) = &self.education {
            if education.iter().any(|e| e.degree.trim().is_empty()) {
                return Err(DomainError::validation("every education entry needs a degree"));
            }
        }
        if let Some(experience) = &self.experience {
            if experience.iter().any(|e| e.title.trim().is_empty()) {
                return Err(DomainError::validation("every experience entry needs a title"));
            }
        }

        if let Some(name) = self.fullname {
            user.fullname = name.trim().to_string();
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(phone) = phone {
            user.phone_number = phone;
        }
        if let Some(address) = self.address {
            user.address = Some(address);
        }
        if let Some(city) = self.city {
            user.city = Some(city);
        }
        if let Some(state) = self.state {
            user.state = Some(state);
        }

        let profile = &mut user.profile;
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        if let Some(skills) = self.skills {
            profile.skills = parse_skills(&skills.join(","));
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(gender);
        }
        if let Some(dob) = self.date_of_birth {
            profile.date_of_birth = Some(dob);
        }
        if let Some(education) = self.education {
            profile.education = education;
        }
        if let Some(experience) = self.experience {
            profile.experience = experience;
        }
        if let Some((url, original_name)) = self.resume {
            profile.resume = Some(url);
            profile.resume_original_name = Some(original_name);
        }
        if let Some(photo) = self.profile_photo {
            profile.profile_photo = Some(photo);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jobboard_auth::Role;

    use super::*;
    use crate::RegisterUser;

    fn complete_profile() -> Profile {
        Profile {
            skills: vec!["Rust".into()],
            resume: Some("https://cdn/resume.pdf".into()),
            education: vec![Education {
                degree: "BSc Computer Science".into(),
                ..Education::default()
            }],
            gender: Some(Gender::Female),
            ..Profile::default()
        }
    }

    fn user() -> User {
        User::register(
            RegisterUser {
                fullname: "Sam".into(),
                email: "sam@example.com".into(),
                phone_number: "1112223334".into(),
                password: "password".into(),
                role: Role::Jobseeker,
            },
            "hash".into(),
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn complete_profiles_pass() {
        assert_eq!(check_profile_completeness(&complete_profile()), Ok(()));
    }

    #[test]
    fn every_gap_is_reported() {
        let gaps = check_profile_completeness(&Profile::default()).unwrap_err();
        assert_eq!(
            gaps,
            vec![ProfileGap::Skills, ProfileGap::Resume, ProfileGap::Education, ProfileGap::Gender]
        );
    }

    #[test]
    fn education_without_degree_does_not_count() {
        let mut profile = complete_profile();
        profile.education = vec![Education {
            degree: "  ".into(),
            institution: "MIT".into(),
            ..Education::default()
        }];
        assert_eq!(check_profile_completeness(&profile), Err(vec![ProfileGap::Education]));
    }

    #[test]
    fn skills_are_an_ordered_set() {
        assert_eq!(parse_skills("Rust, Go ,rust,, SQL"), vec!["Rust", "Go", "SQL"]);
    }

    #[test]
    fn empty_updates_are_rejected() {
        let mut u = user();
        assert!(ProfileUpdate::default().apply_to(&mut u).is_err());
    }

    #[test]
    fn invalid_updates_change_nothing() {
        let mut u = user();
        let before = u.clone();
        let update = ProfileUpdate {
            fullname: Some("New Name".into()),
            phone_number: Some("123".into()),
            ..ProfileUpdate::default()
        };
        assert!(update.apply_to(&mut u).is_err());
        assert_eq!(u, before);
    }

    #[test]
    fn resume_upload_records_url_and_original_name() {
        let mut u = user();
        ProfileUpdate {
            resume: Some(("https://cdn/r.pdf".into(), "cv.pdf".into())),
            skills: Some(vec!["Rust".into(), "rust".into()]),
            ..ProfileUpdate::default()
        }
        .apply_to(&mut u)
        .unwrap();
        assert_eq!(u.profile.resume.as_deref(), Some("https://cdn/r.pdf"));
        assert_eq!(u.profile.resume_original_name.as_deref(), Some("cv.pdf"));
        assert_eq!(u.profile.skills, vec!["Rust"]);
    }

    #[test]
    fn education_entries_reject_unknown_fields() {
        let parsed: Result<Vec<Education>, _> =
            serde_json::from_str(r#"[{"degree":"BSc","gpa":4.0}]"#);
        assert!(parsed.is_err());
    }
}
