//! Validation rules for every form the client submits

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Validate, ValidationErrors, Validator};
use crate::models::{
    InviteMemberRequest, LabelRequest, LoginRequest, ProjectRequest, RegisterRequest, TaskRequest,
    UpdateMemberRoleRequest, WorkspaceRequest,
};
use crate::rbac::WorkspaceRole;

pub const PRIORITIES: [&str; 4] = ["LOW", "MEDIUM", "HIGH", "CRITICAL"];
pub const TASK_STATUSES: [&str; 5] = ["TODO", "IN_PROGRESS", "IN_REVIEW", "DONE", "CANCELLED"];

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));
static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));
static PROJECT_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9_-]+$").expect("valid regex"));
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

const HEX_COLOR_MESSAGE: &str = "Color must be a valid hex color (e.g. #A1B2C3)";

fn workspace_roles() -> Vec<&'static str> {
    WorkspaceRole::ALL.iter().map(|r| r.as_str()).collect()
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("email", &self.email).email("Invalid email address");
        v.field("password", &self.password)
            .min_len(8, "Password must be at least 8 characters long");
        v.finish()
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .min_len(2, "Name must be at least 2 characters")
            .max_len(100, "Name must be at most 100 characters");
        v.field("email", &self.email).email("Invalid email address");
        v.field("password", &self.password)
            .min_len(8, "Password must be at least 8 characters long");
        v.finish()
    }
}

impl Validate for WorkspaceRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .min_len(2, "Name must be at least 2 characters")
            .max_len(200, "Name must be at most 200 characters");
        v.field("description", &self.description)
            .required("Description is required");
        v.field("slug", &self.slug)
            .min_len(2, "Slug must be at least 2 characters")
            .max_len(200, "Slug must be at most 200 characters")
            .matches(&SLUG, "Slug must contain only lowercase letters, numbers, and hyphens");
        if let Some(logo) = v.optional("logoUrl", self.logo_url.as_deref()) {
            logo.min_len(2, "Logo URL must be at least 2 characters")
                .max_len(200, "Logo URL must be at most 200 characters")
                .url("Logo URL must be a valid URL");
        }
        v.finish()
    }
}

impl Validate for ProjectRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .min_len(2, "Name must be at least 2 characters")
            .max_len(100, "Name must be at most 100 characters");
        v.field("description", &self.description)
            .required("Description is required");
        v.field("projectKey", &self.project_key)
            .min_len(3, "Project key must be at least 3 characters")
            .max_len(20, "Project key must be at most 20 characters")
            .matches(
                &PROJECT_KEY,
                "Project key must contain only uppercase letters, numbers, hyphens, and underscores",
            );
        v.field("priority", &self.priority)
            .one_of(&PRIORITIES, "Priority should be valid");
        v.field("color", &self.color).matches(&HEX_COLOR, HEX_COLOR_MESSAGE);
        v.field("startDate", &self.start_date)
            .matches(&ISO_DATE, "Start date must be in yyyy-MM-dd format");
        v.field("endDate", &self.end_date)
            .matches(&ISO_DATE, "End date must be in yyyy-MM-dd format");
        v.finish()
    }
}

impl Validate for TaskRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("title", &self.title)
            .min_len(3, "Title must be at least 3 characters")
            .max_len(200, "Title must be at most 200 characters");
        v.field("status", &self.status)
            .one_of(&TASK_STATUSES, "Status must be valid");
        v.field("priority", &self.priority)
            .one_of(&PRIORITIES, "Priority must be valid");
        if let Some(hours) = self.estimated_hours {
            v.number("estimatedHours", hours)
                .min(0.0, "Estimated hours must be at least 0");
        }
        v.finish()
    }
}

impl Validate for LabelRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("name", &self.name)
            .min_len(2, "Name must be at least 2 characters")
            .max_len(100, "Name must be at most 100 characters");
        v.field("color", &self.color).matches(&HEX_COLOR, HEX_COLOR_MESSAGE);
        v.field("description", &self.description)
            .required("Description is required");
        v.finish()
    }
}

impl Validate for InviteMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("email", &self.email).email("Email must be valid");
        v.field("memberType", &self.member_type)
            .one_of(&workspace_roles(), "Role should be valid");
        v.finish()
    }
}

impl Validate for UpdateMemberRoleRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.field("memberType", &self.member_type)
            .one_of(&workspace_roles(), "Role should be valid");
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectRequest {
        ProjectRequest {
            name: "Apollo".into(),
            description: "Moonshot".into(),
            project_key: "APL-1".into(),
            priority: "HIGH".into(),
            color: "#A1B2C3".into(),
            start_date: "2026-01-01".into(),
            end_date: "2026-06-30".into(),
            is_public: false,
        }
    }

    #[test]
    fn valid_project_passes() {
        assert!(project().validate().is_ok());
    }

    #[test]
    fn project_key_and_dates_are_checked() {
        let mut p = project();
        p.project_key = "ap".into();
        p.start_date = "01/01/2026".into();
        p.priority = "URGENT".into();

        let errors = p.validate().unwrap_err();
        assert_eq!(
            errors.messages_for("projectKey"),
            vec![
                "Project key must be at least 3 characters",
                "Project key must contain only uppercase letters, numbers, hyphens, and underscores",
            ]
        );
        assert_eq!(errors.messages_for("startDate"), vec!["Start date must be in yyyy-MM-dd format"]);
        assert_eq!(errors.messages_for("priority"), vec!["Priority should be valid"]);
        assert!(errors.messages_for("endDate").is_empty());
    }

    #[test]
    fn workspace_slug_and_logo_rules() {
        let mut w = WorkspaceRequest {
            name: "Acme".into(),
            description: "HQ".into(),
            slug: "Acme Corp".into(),
            logo_url: Some("not a url".into()),
        };
        let errors = w.validate().unwrap_err();
        assert_eq!(
            errors.messages_for("slug"),
            vec!["Slug must contain only lowercase letters, numbers, and hyphens"]
        );
        assert_eq!(errors.messages_for("logoUrl"), vec!["Logo URL must be a valid URL"]);

        w.slug = "acme-corp".into();
        w.logo_url = Some(String::new());
        assert!(w.validate().is_ok());
    }

    #[test]
    fn task_rules() {
        let task = TaskRequest {
            title: "Do".into(),
            status: "BLOCKED".into(),
            priority: "LOW".into(),
            estimated_hours: Some(-1.0),
            ..Default::default()
        };
        let errors = task.validate().unwrap_err();
        assert_eq!(errors.messages_for("title"), vec!["Title must be at least 3 characters"]);
        assert_eq!(errors.messages_for("status"), vec!["Status must be valid"]);
        assert_eq!(errors.messages_for("estimatedHours"), vec!["Estimated hours must be at least 0"]);
        assert!(errors.messages_for("priority").is_empty());
    }

    #[test]
    fn label_and_login_rules() {
        let label = LabelRequest {
            name: "b".into(),
            color: "red".into(),
            description: String::new(),
        };
        assert_eq!(label.validate().unwrap_err().len(), 3);

        let login = LoginRequest {
            email: "ada@example".into(),
            password: "short".into(),
        };
        let errors = login.validate().unwrap_err();
        assert_eq!(errors.messages_for("email"), vec!["Invalid email address"]);
        assert_eq!(
            errors.messages_for("password"),
            vec!["Password must be at least 8 characters long"]
        );
    }

    #[test]
    fn invitation_role_must_be_a_workspace_role() {
        let invite = InviteMemberRequest {
            email: "bob@example.com".into(),
            member_type: "GUEST".into(),
        };
        assert_eq!(
            invite.validate().unwrap_err().messages_for("memberType"),
            vec!["Role should be valid"]
        );

        let role = UpdateMemberRoleRequest {
            member_type: "VIEWER".into(),
        };
        assert!(role.validate().is_ok());
    }
}
