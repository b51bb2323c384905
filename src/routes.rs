use crate::gate::{Decision, Destination, Gate};
use crate::models::Role;

/// RouteRequirement
///
/// Static authorization metadata attached to a guarded path: the roles
/// permitted to enter it. An empty slice means any authenticated session may
/// enter (the guard is attached, but no specific role is demanded).
#[derive(Debug, Clone, Copy)]
pub struct RouteRequirement {
    pub roles: &'static [Role],
}

/// RouteDef
///
/// One navigable path and its guard. `requirement: None` marks a public
/// route (login, register): no guard runs at all, so even anonymous
/// visitors may enter.
#[derive(Debug, Clone, Copy)]
pub struct RouteDef {
    pub path: &'static str,
    pub requirement: Option<RouteRequirement>,
}

const fn public(path: &'static str) -> RouteDef {
    RouteDef {
        path,
        requirement: None,
    }
}

const fn guarded(path: &'static str, roles: &'static [Role]) -> RouteDef {
    RouteDef {
        path,
        requirement: Some(RouteRequirement { roles }),
    }
}

/// The portal's route table.
///
/// Public: login and register. Admin console and the admin dashboard demand
/// Admin; each per-role dashboard demands its role; the profile page admits
/// any of the three.
pub const ROUTES: &[RouteDef] = &[
    public("/login"),
    public("/register"),
    guarded("/admin/dashboard", &[Role::Admin]),
    guarded("/admin/users", &[Role::Admin]),
    guarded("/admin/create-user", &[Role::Admin]),
    guarded("/employee/dashboard", &[Role::Employee]),
    guarded("/intern/dashboard", &[Role::Intern]),
    guarded("/profile", &[Role::Admin, Role::Employee, Role::Intern]),
];

/// Navigator
///
/// The navigation entry point the hosting application drives: resolves a
/// requested path against the route table and passes the route's
/// requirement to the gate.
#[derive(Clone)]
pub struct Navigator {
    table: &'static [RouteDef],
    gate: Gate,
}

impl Navigator {
    pub fn new(gate: Gate) -> Self {
        Self {
            table: ROUTES,
            gate,
        }
    }

    /// Looks up a path in the route table.
    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        self.table.iter().find(|route| route.path == path)
    }

    /// navigate
    ///
    /// Decides a navigation attempt. Unknown paths redirect to login (the
    /// table's default route). Public routes allow without consulting the
    /// gate; guarded routes defer to `Gate::evaluate`.
    pub fn navigate(&self, path: &str) -> Decision {
        let Some(route) = self.resolve(path) else {
            return Decision::Redirect(Destination::Login);
        };

        match &route.requirement {
            None => Decision::Allow,
            Some(requirement) => self.gate.evaluate(Some(requirement.roles)),
        }
    }
}
