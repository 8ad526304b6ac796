//! Servers (brands) and support staff, plus the create/edit forms the console
//! submits for them. Forms validate themselves so the modals can show errors
//! next to each field before any request is made.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name → message. Empty means the form is valid.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerForm {
    pub name: String,
    pub code: String,
    pub base_url: String,
    pub active: bool,
}

impl ServerForm {
    pub fn from_server(server: &Server) -> Self {
        Self {
            name: server.name.clone(),
            code: server.code.clone().unwrap_or_default(),
            base_url: server.base_url.clone().unwrap_or_default(),
            active: server.active.unwrap_or(true),
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Server name is required".to_string());
        }
        let code = self.code.trim();
        if code.is_empty() {
            errors.insert("code", "Server code is required".to_string());
        } else if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            errors.insert("code", "Use letters, digits, '-' or '_' only".to_string());
        }
        let url = self.base_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.insert("base_url", "URL must start with http:// or https://".to_string());
        }
        errors
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportStaff {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub employee_id: String,
    /// Only sent when creating or resetting a password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub active: bool,
}

impl StaffForm {
    pub fn from_staff(staff: &SupportStaff) -> Self {
        Self {
            name: staff.name.clone(),
            email: staff.email.clone().unwrap_or_default(),
            phone: staff.phone.clone().unwrap_or_default(),
            employee_id: staff.employee_id.clone().unwrap_or_default(),
            password: None,
            active: staff.active.unwrap_or(true),
        }
    }

    /// `creating` additionally requires a password.
    pub fn validate(&self, creating: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required".to_string());
        }
        if self.employee_id.trim().is_empty() {
            errors.insert("employee_id", "Employee ID is required".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Email is required".to_string());
        } else if !is_plausible_email(email) {
            errors.insert("email", "Please enter a valid email".to_string());
        }
        let phone = self.phone.trim();
        if !phone.is_empty() && (phone.len() != 10 || !phone.chars().all(|c| c.is_ascii_digit())) {
            errors.insert("phone", "Phone number must be 10 digits".to_string());
        }
        match self.password.as_deref() {
            Some(p) if p.len() < 6 => {
                errors.insert("password", "Password must be at least 6 characters".to_string());
            }
            None if creating => {
                errors.insert("password", "Password is required".to_string());
            }
            _ => {}
        }
        errors
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}

/// Query parameters for the server and staff list endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("searchTerm", search.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_form_requires_name_and_code() {
        let errors = ServerForm::default().validate();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("code"));
        assert!(!errors.contains_key("base_url"));
    }

    #[test]
    fn test_server_form_rejects_bad_url_and_code() {
        let form = ServerForm {
            name: "Alpha".into(),
            code: "al pha".into(),
            base_url: "ftp://alpha".into(),
            active: true,
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("code"));
        assert!(errors.contains_key("base_url"));
    }

    #[test]
    fn test_staff_form_password_rules() {
        let mut form = StaffForm {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            phone: "9876543210".into(),
            employee_id: "EMP1".into(),
            password: None,
            active: true,
        };
        assert!(form.validate(false).is_empty());
        assert!(form.validate(true).contains_key("password"));

        form.password = Some("abc".into());
        assert!(form.validate(false).contains_key("password"));

        form.password = Some("secret1".into());
        assert!(form.validate(true).is_empty());
    }

    #[test]
    fn test_staff_form_email_and_phone() {
        let form = StaffForm {
            name: "Bob".into(),
            email: "bob@example".into(),
            phone: "12345".into(),
            employee_id: "EMP1".into(),
            password: None,
            active: true,
        };
        let errors = form.validate(false);
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("phone"));
    }

    #[test]
    fn test_staff_form_omits_absent_password() {
        let json = serde_json::to_value(StaffForm::default()).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("employeeId").is_some());
    }
}
