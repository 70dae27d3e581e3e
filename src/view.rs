//! View selection from a published session snapshot.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every front end applies the same gate: nothing protected renders until the
//! stored session is resolved, and an unresolved or anonymous session lands
//! on the login view.

use std::fmt;

use crate::session::SessionState;
use crate::types::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Login,
    Dashboard,
}

#[must_use]
pub fn route(state: &SessionState) -> View {
    if state.initializing {
        View::Loading
    } else if state.user.is_some() {
        View::Dashboard
    } else {
        View::Login
    }
}

/// User details shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub greeting: String,
    pub rows: Vec<(&'static str, String)>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let created = user
            .created_at
            .as_deref()
            .and_then(|ts| ts.split('T').next())
            .filter(|date| !date.is_empty())
            .unwrap_or("N/A")
            .to_owned();
        Self {
            greeting: format!("Welcome, {}!", user.name),
            rows: vec![
                ("ID", user.id.to_string()),
                ("Name", user.name.clone()),
                ("Email", user.email.clone()),
                ("Created", created),
            ],
        }
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.greeting)?;
        for (label, value) in &self.rows {
            writeln!(f, "  {label}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
