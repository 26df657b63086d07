//! Info Object and related types.
//!
//! The Info object provides metadata about the API. Generators use it for
//! package names, versions and README content.

use crate::{Extensions, error::OpenRpcResult, validation::Validate};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// Metadata about the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct Info {
    /// The title of the application.
    pub title: String,

    /// A verbose description of the application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// A URL to the Terms of Service for the API.
    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    /// The version of the API description, distinct from the `openrpc` field.
    pub version: String,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            license: None,
            version: version.into(),
            extensions: Extensions::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }
}

impl Validate for Info {
    fn validate(&self) -> OpenRpcResult<()> {
        if self.title.trim().is_empty() {
            return Err(crate::error::OpenRpcError::missing_field("title"));
        }

        // API versions are free-form; only presence is required
        if self.version.trim().is_empty() {
            return Err(crate::error::OpenRpcError::missing_field("version"));
        }

        if let Some(ref tos) = self.terms_of_service {
            crate::validation::validate_url(tos)?;
        }

        if let Some(ref contact) = self.contact {
            contact.validate()?;
        }

        if let Some(ref license) = self.license {
            license.validate()?;
        }

        self.extensions.validate()
    }
}

/// Contact information for the exposed API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Default)]
pub struct Contact {
    /// The identifying name of the contact person/organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl Contact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Validate for Contact {
    fn validate(&self) -> OpenRpcResult<()> {
        if let Some(ref url) = self.url {
            crate::validation::validate_url(url)?;
        }

        if let Some(ref email) = self.email {
            crate::validation::validate_email(email)?;
        }

        self.extensions.validate()
    }
}

/// License information for the exposed API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct License {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten, skip_serializing_if = "Extensions::is_empty")]
    #[builder(default)]
    pub extensions: Extensions,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Validate for License {
    fn validate(&self) -> OpenRpcResult<()> {
        if self.name.is_empty() {
            return Err(crate::error::OpenRpcError::missing_field("name"));
        }

        if let Some(ref url) = self.url {
            crate::validation::validate_url(url)?;
        }

        self.extensions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_info_builder() {
        let info = Info::builder()
            .title("Test API".to_string())
            .version("1.0.0".to_string())
            .description("An API".to_string())
            .build();

        assert_eq!(info.title, "Test API");
        assert_eq!(info.description.as_deref(), Some("An API"));
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_free_form_api_version() {
        assert!(Info::new("Test API", "2024-06").validate().is_ok());
        assert!(Info::new("Test API", " ").validate().is_err());
        assert!(Info::new("", "1.0.0").validate().is_err());
    }

    #[test]
    fn test_contact_validation() {
        let contact = Contact::new()
            .with_name("API team")
            .with_email("api@example.com")
            .with_url("https://example.com");
        assert!(contact.validate().is_ok());

        let contact = Contact::new().with_email("not-an-email");
        assert!(contact.validate().is_err());
    }

    #[test]
    fn test_info_deserialization() {
        let info: Info = serde_json::from_value(json!({
            "title": "Petstore",
            "version": "1.0.0",
            "contact": { "name": "Pets", "email": "pets@example.com" },
            "license": { "name": "MIT" }
        }))
        .unwrap();

        assert_eq!(info.contact.unwrap().name.as_deref(), Some("Pets"));
        assert_eq!(info.license.unwrap().name, "MIT");
    }
}
