use crate::server::db::{ClientRecord, Database};
use crate::time::advance_mock_time;
use crate::types::request::Query;

fn mock_client(razao_social: &str, cpf: &str, org: &str) -> ClientRecord {
    ClientRecord {
        id: 0,
        razao_social: razao_social.to_string(),
        cpf: cpf.to_string(),
        email: None,
        telefone: None,
        endereco: None,
        organization_id: org.to_string(),
        create_time: 0,
        update_time: 0,
    }
}

fn org_query(org: &str) -> Query {
    Query {
        org: Some(org.to_string()),
        ..Default::default()
    }
}

pub fn run_client_tests(db: &Database) {
    let clients = [
        mock_client("Acme Ltda", "12345678000190", "org_1"),
        mock_client("Borges Transportes", "98765432000155", "org_1"),
        mock_client("Cunha Metalúrgica", "11222333000181", "org_2"),
    ];

    let mut created = vec![];
    db.with_transaction(|tx| {
        for client in clients.iter() {
            let ret = tx.create_client(client.clone()).unwrap();
            assert!(ret.id > 0);
            assert!(ret.create_time > 0);
            created.push(ret);
        }
        Ok(())
    })
    .unwrap();

    db.with_transaction(|tx| {
        // Scoped get only sees rows of the same organization
        let ret = tx.get_client(created[0].id, Some("org_1")).unwrap().unwrap();
        assert_eq!(ret, created[0]);

        assert!(tx.get_client(created[0].id, Some("org_2")).unwrap().is_none());

        // Unscoped get is reserved for super_admin callers
        let ret = tx.get_client(created[2].id, None).unwrap().unwrap();
        assert_eq!(ret, created[2]);

        // Organization isolation in lists
        let list = tx.list_clients(&org_query("org_1")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(tx.count_clients(&org_query("org_1")).unwrap(), 2);

        let list = tx.list_clients(&org_query("org_2")).unwrap();
        assert_eq!(list.len(), 1);

        let list = tx.list_clients(&org_query("org_9")).unwrap();
        assert!(list.is_empty());

        // Case-insensitive substring search on the display field
        let query = Query {
            search: Some("acme".to_string()),
            ..org_query("org_1")
        };
        let list = tx.list_clients(&query).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].razao_social, "Acme Ltda");

        // Sort column outside the allow-list falls back to id ascending
        let query = Query {
            sort: Some("email; DROP TABLE client".to_string()),
            ..org_query("org_1")
        };
        let list = tx.list_clients(&query).unwrap();
        assert_eq!(list[0].id, created[0].id);

        Ok(())
    })
    .unwrap();

    // Update respects the organization scope
    db.with_transaction(|tx| {
        advance_mock_time(10);

        let mut client = created[0].clone();
        client.razao_social = "Acme Indústria Ltda".to_string();

        assert!(tx
            .update_client(client.clone(), Some("org_2"))
            .unwrap()
            .is_none());

        let updated = tx
            .update_client(client.clone(), Some("org_1"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.razao_social, "Acme Indústria Ltda");
        assert!(updated.update_time > created[0].update_time);

        Ok(())
    })
    .unwrap();

    // Delete respects the organization scope and reports the benign race
    db.with_transaction(|tx| {
        assert!(!tx.delete_client(created[1].id, Some("org_2")).unwrap());
        assert!(tx.delete_client(created[1].id, Some("org_1")).unwrap());

        // Second delete finds nothing, callers surface this as NotFound
        assert!(!tx.delete_client(created[1].id, Some("org_1")).unwrap());

        assert_eq!(tx.count_clients(&org_query("org_1")).unwrap(), 1);
        Ok(())
    })
    .unwrap();
}
