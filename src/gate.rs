use crate::models::Role;
use crate::session::SessionStore;

/// Destination
///
/// Where a denied navigation is sent. Unauthenticated requests go back to
/// the login page; authenticated-but-wrong-role requests go to the
/// unauthorized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Unauthorized,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Login => "/login",
            Destination::Unauthorized => "/unauthorized",
        }
    }
}

/// Decision
///
/// The outcome of a gate evaluation. The gate never throws: every
/// navigation attempt resolves to Allow or to a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Destination),
}

/// Gate
///
/// The route authorization gate: decides, for each navigation attempt,
/// whether it may proceed. A pure function of (session state, required-roles
/// set)—it reads the SessionStore fresh on every evaluation and never
/// mutates it.
#[derive(Clone)]
pub struct Gate {
    store: SessionStore,
}

impl Gate {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// evaluate
    ///
    /// 1. No valid session → Redirect(Login). Terminal; the role is not
    ///    consulted.
    /// 2. A requirement of `None` or of an empty slice admits any
    ///    authenticated session. An empty collection is explicitly not
    ///    "deny all".
    /// 3. Otherwise the session's primary role must be in the requirement,
    ///    else Redirect(Unauthorized).
    pub fn evaluate(&self, required_roles: Option<&[Role]>) -> Decision {
        let Some(session) = self.store.current_session() else {
            return Decision::Redirect(Destination::Login);
        };

        let required = match required_roles {
            None => return Decision::Allow,
            Some(roles) if roles.is_empty() => return Decision::Allow,
            Some(roles) => roles,
        };

        match session.primary_role() {
            Some(role) if required.contains(&role) => Decision::Allow,
            resolved => {
                tracing::debug!(required = ?required, resolved = ?resolved,
                    "navigation denied for role mismatch");
                Decision::Redirect(Destination::Unauthorized)
            }
        }
    }
}
