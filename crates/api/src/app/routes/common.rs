use std::collections::BTreeMap;
use std::str::FromStr;

use axum::extract::Multipart;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use jobboard_core::DomainError;
use jobboard_infra::collaborators::Upload;

use crate::app::errors::{ApiError, ApiResult};

/// Parse a `:id` path segment; anything that is not an id of the right kind
/// answers 400 `invalid_id`.
pub fn path_id<T>(raw: &str) -> ApiResult<T>
where
    T: FromStr<Err = DomainError>,
{
    Ok(raw.trim().parse::<T>()?)
}

/// A fully-read multipart body: text fields plus attached files.
///
/// Handlers `take` the fields they know and call [`MultipartForm::finish`],
/// which rejects anything left over.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, Upload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        Upload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Text field, or empty if absent (the domain reports missing values).
    pub fn text(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    /// Text field; absent and blank are both `None`.
    pub fn optional(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name).filter(|v| !v.trim().is_empty())
    }

    pub fn parsed<T>(&mut self, name: &str) -> ApiResult<Option<T>>
    where
        T: FromStr<Err = DomainError>,
    {
        Ok(self.optional(name).map(|v| v.parse::<T>()).transpose()?)
    }

    pub fn date(&mut self, name: &str) -> ApiResult<Option<NaiveDate>> {
        self.optional(name)
            .map(|v| {
                NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                    .map_err(|_| ApiError::from(DomainError::validation(format!("{name} must be a YYYY-MM-DD date"))))
            })
            .transpose()
    }

    /// A field carrying a JSON document (e.g. an array of education entries).
    pub fn json<T: DeserializeOwned>(&mut self, name: &str) -> ApiResult<Option<T>> {
        self.optional(name)
            .map(|v| {
                serde_json::from_str(&v)
                    .map_err(|e| ApiError::from(DomainError::validation(format!("{name} is not valid: {e}"))))
            })
            .transpose()
    }

    pub fn file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    /// Fail on any field or file the handler did not take.
    pub fn finish(self) -> ApiResult<()> {
        let unknown: Vec<&str> = self
            .fields
            .keys()
            .chain(self.files.keys())
            .map(String::as_str)
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        Err(DomainError::validation(format!("unknown field(s): {}", unknown.join(", "))).into())
    }
}
