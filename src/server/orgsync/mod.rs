pub mod config;
pub mod factory;
pub mod registry;

use std::sync::Arc;

use log::info;
use thiserror::Error;

use crate::server::db::{Database, OrganizationRecord};

use registry::{OrganizationRegistry, RegistryError, UnionRegistry};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("organization database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Lazily mirrors organizations from the external registry into the local
/// store. Invoked before any write on behalf of an organization, so no
/// domain row can ever point at an organization this store does not know.
pub struct OrgSync {
    db: Arc<Database>,
    registry: UnionRegistry,
}

impl OrgSync {
    pub fn new(db: Arc<Database>, registry: UnionRegistry) -> Self {
        Self { db, registry }
    }

    /// Idempotent and safe to race: two concurrent calls for a brand-new
    /// organization both succeed and exactly one logical row remains. The
    /// insert is conflict-tolerant (insert-if-absent), not insert-then-check.
    pub fn ensure_exists(&self, org_id: &str) -> Result<(), SyncError> {
        let exists = self
            .db
            .with_transaction(|tx| tx.is_organization_exists(org_id))?;
        if exists {
            return Ok(());
        }

        // Only consult the registry on the slow path. A failure here aborts
        // the whole operation; proceeding would leave domain rows with a
        // dangling organization id.
        let org = self.registry.fetch(org_id)?;

        let inserted = self.db.with_transaction(|tx| {
            tx.insert_organization_if_absent(&OrganizationRecord {
                id: org.id,
                name: org.name,
                create_time: 0,
                update_time: 0,
            })
        })?;
        if inserted {
            info!("Provisioned organization {org_id} from registry");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::registry::StaticRegistry;
    use super::*;
    use crate::server::db::Database;

    fn sync_with(orgs: &[(&str, &str)]) -> OrgSync {
        let db = Arc::new(Database::new_test());
        let table: HashMap<String, String> = orgs
            .iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect();
        OrgSync::new(db, UnionRegistry::Static(StaticRegistry::new(table)))
    }

    #[test]
    fn test_ensure_exists_idempotent() {
        let sync = sync_with(&[("org_1", "Clínica Vida")]);

        sync.ensure_exists("org_1").unwrap();
        sync.ensure_exists("org_1").unwrap();

        let orgs = sync
            .db
            .with_transaction(|tx| tx.list_organizations())
            .unwrap();
        assert_eq!(orgs.len(), 1);
        assert_eq!(orgs[0].id, "org_1");
        assert_eq!(orgs[0].name, "Clínica Vida");
    }

    #[test]
    fn test_unknown_org_fails_and_writes_nothing() {
        let sync = sync_with(&[("org_1", "Clínica Vida")]);

        let err = sync.ensure_exists("org_9").unwrap_err();
        assert!(matches!(err, SyncError::Registry(RegistryError::NotFound(_))));

        let orgs = sync
            .db
            .with_transaction(|tx| tx.list_organizations())
            .unwrap();
        assert!(orgs.is_empty());
    }

    #[test]
    fn test_insert_race_is_tolerated() {
        let sync = sync_with(&[("org_1", "Clínica Vida")]);

        // Simulate the loser of the insert race: the row appears between
        // the existence check and the insert.
        sync.db
            .with_transaction(|tx| {
                tx.insert_organization_if_absent(&OrganizationRecord {
                    id: "org_1".to_string(),
                    name: "Clínica Vida".to_string(),
                    create_time: 0,
                    update_time: 0,
                })
            })
            .unwrap();

        sync.ensure_exists("org_1").unwrap();
        let orgs = sync
            .db
            .with_transaction(|tx| tx.list_organizations())
            .unwrap();
        assert_eq!(orgs.len(), 1);
    }
}
