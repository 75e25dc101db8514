use crate::server::db::{ContaRecord, Database};
use crate::types::request::Query;

fn mock_conta(descricao: &str, valor: u64, vencimento: &str, org: &str) -> ContaRecord {
    ContaRecord {
        id: 0,
        descricao: descricao.to_string(),
        valor,
        vencimento: vencimento.to_string(),
        pago: false,
        organization_id: org.to_string(),
        create_time: 0,
        update_time: 0,
    }
}

pub fn run_conta_tests(db: &Database) {
    let contas = [
        mock_conta("Aluguel", 250000, "2026-09-05", "org_1"),
        mock_conta("Energia elétrica", 38000, "2026-09-10", "org_1"),
        mock_conta("Material de escritório", 12000, "2026-09-01", "org_2"),
    ];

    let mut created = vec![];
    db.with_transaction(|tx| {
        for conta in contas.iter() {
            created.push(tx.create_conta(conta.clone()).unwrap());
        }
        Ok(())
    })
    .unwrap();

    db.with_transaction(|tx| {
        let query = Query {
            org: Some("org_1".to_string()),
            ..Default::default()
        };
        assert_eq!(tx.count_contas(&query).unwrap(), 2);

        // Sort by due date through the allow-list
        let query = Query {
            sort: Some("vencimento".to_string()),
            org: Some("org_1".to_string()),
            ..Default::default()
        };
        let list = tx.list_contas(&query).unwrap();
        assert_eq!(list[0].descricao, "Aluguel");
        assert_eq!(list[1].descricao, "Energia elétrica");

        // Settle a payable
        let mut conta = created[0].clone();
        conta.pago = true;
        let updated = tx.update_conta(conta, Some("org_1")).unwrap().unwrap();
        assert!(updated.pago);

        let ret = tx.get_conta(created[0].id, Some("org_1")).unwrap().unwrap();
        assert!(ret.pago);

        // Cross-organization writes hit nothing
        assert!(tx
            .update_conta(created[2].clone(), Some("org_1"))
            .unwrap()
            .is_none());
        assert!(!tx.delete_conta(created[2].id, Some("org_1")).unwrap());
        assert!(tx.delete_conta(created[2].id, Some("org_2")).unwrap());

        Ok(())
    })
    .unwrap();
}
