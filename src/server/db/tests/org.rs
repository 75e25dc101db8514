use crate::server::db::{Database, OrganizationRecord};

fn mock_org(id: &str, name: &str) -> OrganizationRecord {
    OrganizationRecord {
        id: id.to_string(),
        name: name.to_string(),
        create_time: 0,
        update_time: 0,
    }
}

pub fn run_organization_tests(db: &Database) {
    db.with_transaction(|tx| {
        assert!(!tx.is_organization_exists("org_1").unwrap());

        // First insert creates the row
        let inserted = tx
            .insert_organization_if_absent(&mock_org("org_1", "Clínica Vida"))
            .unwrap();
        assert!(inserted);
        assert!(tx.is_organization_exists("org_1").unwrap());

        // Inserting again is a no-op, the original name wins
        let inserted = tx
            .insert_organization_if_absent(&mock_org("org_1", "Other Name"))
            .unwrap();
        assert!(!inserted);

        let org = tx.get_organization("org_1").unwrap().unwrap();
        assert_eq!(org.name, "Clínica Vida");

        assert!(tx.get_organization("org_9").unwrap().is_none());

        tx.insert_organization_if_absent(&mock_org("org_2", "Ambulatório Azul"))
            .unwrap();

        // Listing is ordered by name
        let orgs = tx.list_organizations().unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[0].name, "Ambulatório Azul");
        assert_eq!(orgs[1].name, "Clínica Vida");

        let renamed = tx
            .update_organization_name("org_2", "Ambulatório Verde")
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Ambulatório Verde");

        assert!(tx
            .update_organization_name("org_9", "Ghost")
            .unwrap()
            .is_none());

        Ok(())
    })
    .unwrap();
}
