use crate::types::role::Role;

/// Authorization actions. `Manage` supersedes the four concrete actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Manage,
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

/// Domain entity categories subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    All,
    Client,
    Exame,
    Medico,
    Colaborador,
    ExameCli,
    Anamnese,
    ContasAPagar,
    Organization,
}

impl Subject {
    /// Maps an API resource path segment to its subject type.
    pub fn from_resource(resource: &str) -> Option<Self> {
        match resource {
            "clients" => Some(Subject::Client),
            "exames" => Some(Subject::Exame),
            "medicos" => Some(Subject::Medico),
            "colaboradores" => Some(Subject::Colaborador),
            "exames-cli" => Some(Subject::ExameCli),
            "anamneses" => Some(Subject::Anamnese),
            "contas" => Some(Subject::ContasAPagar),
            "orgs" => Some(Subject::Organization),
            _ => None,
        }
    }
}

/// Attribute constraint attached to a grant. The grant only applies to
/// rows whose corresponding attribute equals the constraint value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    None,
    Organization(String),
    Id(String),
}

#[derive(Debug, Clone)]
pub struct Grant {
    action: Action,
    subject: Subject,
    constraint: Constraint,
}

impl Grant {
    fn matches_type(&self, action: Action, subject: Subject) -> bool {
        if self.action != Action::Manage && self.action != action {
            return false;
        }
        if self.subject != Subject::All && self.subject != subject {
            return false;
        }
        true
    }

    fn constraint_holds(&self, attrs: &SubjectAttrs) -> bool {
        match self.constraint {
            Constraint::None => true,
            Constraint::Organization(ref org) => attrs.organization_id == Some(org.as_str()),
            Constraint::Id(ref id) => attrs.id == Some(id.as_str()),
        }
    }
}

/// Attributes of a concrete row, supplied for row-level checks once the
/// row (or at least its key) is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubjectAttrs<'a> {
    pub organization_id: Option<&'a str>,
    pub id: Option<&'a str>,
}

/// The capability set computed for one request. Never cached across
/// requests: role and active organization can change between calls.
#[derive(Debug, Clone)]
pub struct Ability {
    grants: Vec<Grant>,
}

impl Ability {
    /// Type-level check, used before any query (list/create, and as the
    /// first phase for row operations). Constraints are ignored here
    /// since no concrete row is known yet.
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.grants
            .iter()
            .any(|grant| grant.matches_type(action, subject))
    }

    /// Row-level check, the second phase: re-verifies a loaded row against
    /// the grant constraint. Callers surface a failure as NotFound, never
    /// Forbidden, so cross-organization row existence does not leak.
    pub fn can_instance(&self, action: Action, subject: Subject, attrs: &SubjectAttrs) -> bool {
        self.grants
            .iter()
            .any(|grant| grant.matches_type(action, subject) && grant.constraint_holds(attrs))
    }
}

const ORG_SCOPED_SUBJECTS: [Subject; 7] = [
    Subject::Client,
    Subject::Exame,
    Subject::Medico,
    Subject::Colaborador,
    Subject::ExameCli,
    Subject::Anamnese,
    Subject::ContasAPagar,
];

/// Builds the capability set for a role within its active organization.
///
/// A non-super_admin role without an organization yields no grants at all;
/// handlers reject such requests earlier with NoActiveOrganization, this
/// is the backstop. Unmatched combinations are denied, there is no
/// default-allow.
pub fn build_ability(role: Role, org: Option<&str>) -> Ability {
    let mut grants = vec![];

    match role {
        Role::SuperAdmin => {
            grants.push(Grant {
                action: Action::Manage,
                subject: Subject::All,
                constraint: Constraint::None,
            });
        }
        Role::Admin => {
            if let Some(org) = org {
                for subject in ORG_SCOPED_SUBJECTS {
                    grants.push(Grant {
                        action: Action::Manage,
                        subject,
                        constraint: Constraint::Organization(org.to_string()),
                    });
                }
                for action in [Action::Read, Action::Update] {
                    grants.push(Grant {
                        action,
                        subject: Subject::Organization,
                        constraint: Constraint::Id(org.to_string()),
                    });
                }
            }
        }
        Role::Editor => {
            if let Some(org) = org {
                for action in [Action::Read, Action::Create, Action::Update] {
                    for subject in ORG_SCOPED_SUBJECTS {
                        grants.push(Grant {
                            action,
                            subject,
                            constraint: Constraint::Organization(org.to_string()),
                        });
                    }
                }
                grants.push(Grant {
                    action: Action::Read,
                    subject: Subject::Organization,
                    constraint: Constraint::Id(org.to_string()),
                });
            }
        }
        Role::Viewer => {
            if let Some(org) = org {
                for subject in ORG_SCOPED_SUBJECTS {
                    grants.push(Grant {
                        action: Action::Read,
                        subject,
                        constraint: Constraint::Organization(org.to_string()),
                    });
                }
                grants.push(Grant {
                    action: Action::Read,
                    subject: Subject::Organization,
                    constraint: Constraint::Id(org.to_string()),
                });
            }
        }
    }

    Ability { grants }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 4] = [Role::Viewer, Role::Editor, Role::Admin, Role::SuperAdmin];

    fn org_attrs(org: &str) -> SubjectAttrs {
        SubjectAttrs {
            organization_id: Some(org),
            id: None,
        }
    }

    #[test]
    fn test_cross_org_update_denied() {
        // For all roles, a row owned by another organization is out of
        // reach unless the role is super_admin.
        for role in ALL_ROLES {
            let ability = build_ability(role, Some("org_1"));
            let allowed =
                ability.can_instance(Action::Update, Subject::Client, &org_attrs("org_2"));
            assert_eq!(allowed, role == Role::SuperAdmin, "role {}", role.as_str());
        }
    }

    #[test]
    fn test_delete_grants() {
        let viewer = build_ability(Role::Viewer, Some("org_1"));
        assert!(!viewer.can(Action::Delete, Subject::Client));

        let admin = build_ability(Role::Admin, Some("org_1"));
        assert!(admin.can(Action::Delete, Subject::Client));

        // Editors cannot delete anything
        let editor = build_ability(Role::Editor, Some("org_1"));
        for subject in [
            Subject::Client,
            Subject::Exame,
            Subject::Medico,
            Subject::Colaborador,
            Subject::ExameCli,
            Subject::Anamnese,
            Subject::ContasAPagar,
            Subject::Organization,
        ] {
            assert!(!editor.can(Action::Delete, subject));
        }
    }

    #[test]
    fn test_editor_can_update_but_not_delete() {
        let editor = build_ability(Role::Editor, Some("org_1"));
        assert!(editor.can(Action::Update, Subject::Medico));
        assert!(editor.can_instance(Action::Update, Subject::Medico, &org_attrs("org_1")));
        assert!(!editor.can(Action::Delete, Subject::Medico));
    }

    #[test]
    fn test_viewer_reads_only_own_org() {
        let viewer = build_ability(Role::Viewer, Some("org_1"));
        assert!(viewer.can(Action::Read, Subject::Colaborador));
        assert!(viewer.can_instance(Action::Read, Subject::Colaborador, &org_attrs("org_1")));
        assert!(!viewer.can_instance(Action::Read, Subject::Colaborador, &org_attrs("org_2")));
        assert!(!viewer.can(Action::Create, Subject::Colaborador));
    }

    #[test]
    fn test_manage_implies_concrete_actions() {
        let admin = build_ability(Role::Admin, Some("org_1"));
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(admin.can(action, Subject::Exame));
        }

        let root = build_ability(Role::SuperAdmin, None);
        for action in [Action::Create, Action::Read, Action::Update, Action::Delete] {
            assert!(root.can(action, Subject::Organization));
            assert!(root.can_instance(action, Subject::Client, &org_attrs("org_2")));
        }
    }

    #[test]
    fn test_organization_grants() {
        let admin = build_ability(Role::Admin, Some("org_1"));
        let own = SubjectAttrs {
            organization_id: None,
            id: Some("org_1"),
        };
        let other = SubjectAttrs {
            organization_id: None,
            id: Some("org_2"),
        };
        assert!(admin.can_instance(Action::Read, Subject::Organization, &own));
        assert!(admin.can_instance(Action::Update, Subject::Organization, &own));
        assert!(!admin.can_instance(Action::Update, Subject::Organization, &other));
        assert!(!admin.can(Action::Delete, Subject::Organization));

        let viewer = build_ability(Role::Viewer, Some("org_1"));
        assert!(viewer.can_instance(Action::Read, Subject::Organization, &own));
        assert!(!viewer.can(Action::Update, Subject::Organization));
    }

    #[test]
    fn test_no_org_yields_no_grants() {
        for role in [Role::Viewer, Role::Editor, Role::Admin] {
            let ability = build_ability(role, None);
            assert!(!ability.can(Action::Read, Subject::Client));
            assert!(!ability.can(Action::Create, Subject::Client));
        }
    }

    #[test]
    fn test_from_resource() {
        assert_eq!(Subject::from_resource("clients"), Some(Subject::Client));
        assert_eq!(Subject::from_resource("exames-cli"), Some(Subject::ExameCli));
        assert_eq!(Subject::from_resource("orgs"), Some(Subject::Organization));
        assert_eq!(Subject::from_resource("users"), None);
    }
}
