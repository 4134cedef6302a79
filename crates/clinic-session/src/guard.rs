//! Cookie-presence route guard.
//!
//! Only checks whether the session cookie exists. Token validity is left to
//! the backend, which rejects bad tokens when the data calls are made.

/// Protection rule for one area of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRule {
    pub cookie_name: String,
    /// Path prefixes, matched on segment boundaries.
    pub protected: Vec<String>,
    pub login_path: String,
    pub landing_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl GuardRule {
    pub fn admin(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            protected: vec!["/admin".into()],
            login_path: "/admin/login".into(),
            landing_path: "/admin/dashboard".into(),
        }
    }

    pub fn clinician(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            protected: ["/dashboard", "/patients", "/calendar", "/settings"]
                .into_iter()
                .map(String::from)
                .collect(),
            login_path: "/login".into(),
            landing_path: "/dashboard".into(),
        }
    }

    /// Exact match; `/admin/login/` is not the login page.
    pub fn is_login_path(&self, path: &str) -> bool {
        path == self.login_path
    }

    /// The login page is never protected, even when it sits under a
    /// protected prefix.
    pub fn is_protected(&self, path: &str) -> bool {
        !self.is_login_path(path) && self.protected.iter().any(|p| under(path, p))
    }

    pub fn decide(&self, path: &str, cookie_present: bool) -> GuardDecision {
        if self.is_protected(path) && !cookie_present {
            GuardDecision::Redirect(self.login_path.clone())
        } else if self.is_login_path(path) && cookie_present {
            GuardDecision::Redirect(self.landing_path.clone())
        } else {
            GuardDecision::Proceed
        }
    }
}

/// The set of rules applied to every request; the first redirect wins.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    rules: Vec<GuardRule>,
}

impl Guard {
    pub fn new(rules: Vec<GuardRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[GuardRule] {
        &self.rules
    }

    /// `has_cookie` answers whether a non-empty cookie of that name was sent.
    pub fn decide(&self, path: &str, has_cookie: impl Fn(&str) -> bool) -> GuardDecision {
        self.rules
            .iter()
            .map(|rule| rule.decide(path, has_cookie(&rule.cookie_name)))
            .find(|d| *d != GuardDecision::Proceed)
            .unwrap_or(GuardDecision::Proceed)
    }
}
