use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Job search filters shared by `GET /jobs` (query string) and
/// `POST /job-search` (JSON body).
///
/// All filters are optional and combine with AND. Empty strings are treated
/// as absent, and the department value `"Other"` means "any department".
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams, Validate,
)]
#[into_params(parameter_in = Query)]
pub struct JobFilter {
    /// Case-insensitive substring of the job title
    #[validate(length(max = 200))]
    pub keyword: Option<String>,
    /// Exact role location
    #[validate(length(max = 200))]
    pub location: Option<String>,
    /// Exact department; "Other" disables the department filter
    #[validate(length(max = 200))]
    pub department: Option<String>,
}

impl JobFilter {
    /// Department value that disables department filtering.
    pub const ANY_DEPARTMENT: &'static str = "Other";

    pub fn keyword(&self) -> Option<&str> {
        non_empty(&self.keyword)
    }

    pub fn location(&self) -> Option<&str> {
        non_empty(&self.location)
    }

    pub fn department(&self) -> Option<&str> {
        non_empty(&self.department).filter(|d| *d != Self::ANY_DEPARTMENT)
    }

    /// Lower-cased `LIKE` pattern for the keyword, with `\` as escape character.
    pub fn keyword_pattern(&self) -> Option<String> {
        self.keyword().map(|keyword| {
            let mut escaped = String::with_capacity(keyword.len() + 2);
            for c in keyword.to_lowercase().chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            format!("%{}%", escaped)
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.keyword().is_none() && self.location().is_none() && self.department().is_none()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
