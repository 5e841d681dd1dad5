//! Company directory operations.

use chrono::{DateTime, Utc};
use tracing::instrument;

use jobboard_auth::{Operation, Viewer};
use jobboard_companies::{Company, CompanyFilter, CompanyPatch, CompanyStatus, RegisterCompany};
use jobboard_core::{CompanyId, DomainError};

use super::{JobBoard, ServiceResult, actor_of, folders};
use crate::collaborators::Upload;

impl JobBoard {
    /// One company per recruiter; the new company is linked on the owner's profile.
    #[instrument(skip(self, cmd, logo), err)]
    pub async fn register_company(
        &self,
        viewer: &Viewer,
        cmd: RegisterCompany,
        logo: Option<Upload>,
        now: DateTime<Utc>,
    ) -> ServiceResult<Company> {
        self.authorize(viewer, Operation::RegisterCompany, None).await?;
        let actor = actor_of(viewer)?;

        if self.store.company_by_owner(actor.id).await?.is_some() {
            return Err(DomainError::conflict("recruiter already owns a company").into());
        }
        // Validate before spending an upload on it.
        let mut company = Company::register(cmd, actor.id, None, now)?;
        if let Some(file) = logo {
            company.logo = Some(self.blobs.upload(folders::COMPANY_LOGOS, file).await?);
        }

        self.store.insert_company(&company).await?;
        tracing::info!(company_id = %company.id, owner = %actor.id, "company registered");
        Ok(company)
    }

    /// Role-dependent listing; see [`CompanyFilter::for_viewer`].
    pub async fn list_companies(&self, viewer: &Viewer) -> ServiceResult<Vec<Company>> {
        self.authorize(viewer, Operation::ListCompanies, None).await?;
        Ok(self.store.list_companies(CompanyFilter::for_viewer(viewer)).await?)
    }

    /// Disabled companies read as not found for every viewer.
    pub async fn get_company(&self, viewer: &Viewer, id: CompanyId) -> ServiceResult<Company> {
        self.authorize(viewer, Operation::GetCompany, None).await?;
        self.store
            .company_by_id(id)
            .await?
            .filter(Company::is_active)
            .ok_or_else(|| DomainError::not_found("company").into())
    }

    async fn load_company(&self, id: CompanyId) -> ServiceResult<Company> {
        self.store
            .company_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("company").into())
    }

    #[instrument(skip(self, patch, logo), err)]
    pub async fn update_company(
        &self,
        viewer: &Viewer,
        id: CompanyId,
        mut patch: CompanyPatch,
        logo: Option<Upload>,
    ) -> ServiceResult<Company> {
        let current = self.load_company(id).await?;
        let scope = self.authorize(viewer, Operation::UpdateCompany, Some(current.created_by)).await?;

        if patch.is_empty() && logo.is_none() {
            return Err(DomainError::validation("no company fields to update").into());
        }
        if !patch.is_empty() {
            patch.validate()?;
        }
        if let Some(file) = logo {
            patch.logo = Some(self.blobs.upload(folders::COMPANY_LOGOS, file).await?);
        }

        let company = self
            .store
            .update_company(
                id,
                Box::new(move |c: &mut Company| {
                    if !scope.permits(c.created_by) {
                        return Err(DomainError::not_found("company"));
                    }
                    patch.apply(c)
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("company"))?;
        tracing::info!(company_id = %id, "company updated");
        Ok(company)
    }

    /// active → disabled, by the owner or an admin.
    #[instrument(skip(self), err)]
    pub async fn disable_company(&self, viewer: &Viewer, id: CompanyId) -> ServiceResult<Company> {
        let current = self.load_company(id).await?;
        let scope = self.authorize(viewer, Operation::DisableCompany, Some(current.created_by)).await?;

        let company = self
            .store
            .update_company(
                id,
                Box::new(move |c: &mut Company| {
                    if !scope.permits(c.created_by) {
                        return Err(DomainError::not_found("company"));
                    }
                    c.transition(CompanyStatus::Active, CompanyStatus::Disabled)
                }),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("company"))?;
        tracing::info!(company_id = %id, "company disabled");
        Ok(company)
    }

    /// disabled → active, admins only.
    #[instrument(skip(self), err)]
    pub async fn activate_company(&self, viewer: &Viewer, id: CompanyId) -> ServiceResult<Company> {
        self.authorize(viewer, Operation::ActivateCompany, None).await?;

        let company = self
            .store
            .update_company(
                id,
                Box::new(|c: &mut Company| c.transition(CompanyStatus::Disabled, CompanyStatus::Active)),
            )
            .await?
            .ok_or_else(|| DomainError::not_found("company"))?;
        tracing::info!(company_id = %id, "company activated");
        Ok(company)
    }
}
