use models::caller::{Caller, Role};
use std::collections::HashSet;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// A required environment variable is missing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required environment variable {0}")]
pub struct MissingVar(pub &'static str);

/// Server settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    pub oidc_issuer_url: String,
    pub bind_address: String,
    /// OIDC subjects acting as registrars
    pub registrar_subjects: HashSet<String>,
    /// OIDC subjects acting as faculty
    pub faculty_subjects: HashSet<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, MissingVar> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MissingVar> {
        let oidc_issuer_url = lookup("OIDC_ISSUER_URL").ok_or(MissingVar("OIDC_ISSUER_URL"))?;
        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Ok(Self {
            oidc_issuer_url,
            bind_address,
            registrar_subjects: parse_subjects(lookup("REGISTRAR_SUBJECTS")),
            faculty_subjects: parse_subjects(lookup("FACULTY_SUBJECTS")),
        })
    }

    /// Maps an authenticated subject onto the role it acts with
    pub fn caller_for(&self, subject: &str) -> Caller {
        let role = if self.registrar_subjects.contains(subject) {
            Role::Registrar
        } else if self.faculty_subjects.contains(subject) {
            Role::Faculty
        } else {
            Role::Student
        };

        Caller::new(subject, role)
    }
}

/// Comma-separated list, blanks ignored
fn parse_subjects(raw: Option<String>) -> HashSet<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, MissingVar> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_and_required_vars() {
        assert_eq!(config(&[]).unwrap_err(), MissingVar("OIDC_ISSUER_URL"));

        let config = config(&[("OIDC_ISSUER_URL", "https://idp.example.edu")]).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.registrar_subjects.is_empty());
    }

    #[test]
    fn test_roles_from_subject_lists() {
        let config = config(&[
            ("OIDC_ISSUER_URL", "https://idp.example.edu"),
            ("REGISTRAR_SUBJECTS", " alice , ,bob"),
            ("FACULTY_SUBJECTS", "carol"),
        ])
        .unwrap();

        assert_eq!(config.caller_for("alice").role, Role::Registrar);
        assert_eq!(config.caller_for("bob").role, Role::Registrar);
        assert_eq!(config.caller_for("carol").role, Role::Faculty);
        assert_eq!(config.caller_for("dave").role, Role::Student);
    }
}
