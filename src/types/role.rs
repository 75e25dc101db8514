use serde::{Deserialize, Serialize};

/// Canonical role labels. The claim read from the identity provider is
/// free-form; resolution is total and degrades to the least-privileged
/// role, so every authenticated principal ends up with *some* role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "viewer")]
    Viewer,
    #[serde(rename = "editor")]
    Editor,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super_admin")]
    SuperAdmin,
}

impl Role {
    pub fn resolve(claim: Option<&str>) -> Self {
        match claim {
            Some("editor") => Role::Editor,
            Some("admin") => Role::Admin,
            Some("super_admin") => Role::SuperAdmin,
            _ => Role::Viewer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Viewer => "viewer",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_total() {
        assert_eq!(Role::resolve(Some("viewer")), Role::Viewer);
        assert_eq!(Role::resolve(Some("editor")), Role::Editor);
        assert_eq!(Role::resolve(Some("admin")), Role::Admin);
        assert_eq!(Role::resolve(Some("super_admin")), Role::SuperAdmin);

        // Absent or unrecognized claims degrade to viewer, never error
        assert_eq!(Role::resolve(None), Role::Viewer);
        assert_eq!(Role::resolve(Some("")), Role::Viewer);
        assert_eq!(Role::resolve(Some("root")), Role::Viewer);
        assert_eq!(Role::resolve(Some("ADMIN")), Role::Viewer);
    }
}
