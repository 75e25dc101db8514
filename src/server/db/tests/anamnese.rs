use crate::server::db::{
    AnamneseItemRecord, AnamneseRecord, ColaboradorRecord, Database, ExameCliRecord, ExameRecord,
    MedicoRecord,
};
use crate::types::request::Query;

pub fn run_anamnese_tests(db: &Database) {
    // Fixtures: one client (created by the client tests), one colaborador,
    // one medico, two exames, one client-specific price.
    let (colaborador, medico, exames, exame_cli) = db
        .with_transaction(|tx| {
            let client = tx
                .list_clients(&Query {
                    org: Some("org_1".to_string()),
                    ..Default::default()
                })?
                .remove(0);

            let colaborador = tx.create_colaborador(ColaboradorRecord {
                id: 0,
                nome: "Maria Souza".to_string(),
                cpf: "52998224725".to_string(),
                data_nascimento: "1990-05-17".to_string(),
                funcao: "Soldadora".to_string(),
                client_id: client.id,
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;

            let medico = tx.create_medico(MedicoRecord {
                id: 0,
                nome: "Dr. Carlos Lima".to_string(),
                crm: "CRM/SP 123456".to_string(),
                especialidade: Some("Medicina do Trabalho".to_string()),
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;

            let audiometria = tx.create_exame(ExameRecord {
                id: 0,
                nome: "Audiometria".to_string(),
                valor: 5000,
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;
            let acuidade = tx.create_exame(ExameRecord {
                id: 0,
                nome: "Acuidade Visual".to_string(),
                valor: 3000,
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;

            let exame_cli = tx.create_exame_cli(ExameCliRecord {
                id: 0,
                client_id: client.id,
                exame_id: audiometria.id,
                valor: 4200,
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;

            Ok((colaborador, medico, vec![audiometria, acuidade], exame_cli))
        })
        .unwrap();

    // Price resolution: override for the pair, catalog price otherwise
    db.with_transaction(|tx| {
        let found = tx
            .get_exame_cli_by_pair(colaborador.client_id, exames[0].id, Some("org_1"))
            .unwrap()
            .unwrap();
        assert_eq!(found.valor, 4200);
        assert_eq!(found.id, exame_cli.id);

        assert!(tx
            .get_exame_cli_by_pair(colaborador.client_id, exames[1].id, Some("org_1"))
            .unwrap()
            .is_none());

        Ok(())
    })
    .unwrap();

    // Create an order with items and read it back
    let anamnese = db
        .with_transaction(|tx| {
            let anamnese = tx.create_anamnese(AnamneseRecord {
                id: 0,
                colaborador_id: colaborador.id,
                medico_id: medico.id,
                tipo: "admissional".to_string(),
                status: "pendente".to_string(),
                organization_id: "org_1".to_string(),
                create_time: 0,
                update_time: 0,
            })?;

            for exame in exames.iter() {
                let valor = match tx.get_exame_cli_by_pair(
                    colaborador.client_id,
                    exame.id,
                    Some("org_1"),
                )? {
                    Some(exame_cli) => exame_cli.valor,
                    None => exame.valor,
                };
                tx.create_anamnese_item(AnamneseItemRecord {
                    id: 0,
                    anamnese_id: anamnese.id,
                    exame_id: exame.id,
                    valor,
                    organization_id: "org_1".to_string(),
                })?;
            }

            Ok(anamnese)
        })
        .unwrap();

    db.with_transaction(|tx| {
        let ret = tx.get_anamnese(anamnese.id, Some("org_1")).unwrap().unwrap();
        assert_eq!(ret, anamnese);
        assert!(tx.get_anamnese(anamnese.id, Some("org_2")).unwrap().is_none());

        let items = tx.list_anamnese_items(anamnese.id).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].valor, 4200); // override price
        assert_eq!(items[1].valor, 3000); // catalog price

        // Search matches the order kind
        let query = Query {
            search: Some("admissional".to_string()),
            org: Some("org_1".to_string()),
            ..Default::default()
        };
        assert_eq!(tx.count_anamneses(&query).unwrap(), 1);

        Ok(())
    })
    .unwrap();

    // Update status, then delete the order and its items together
    db.with_transaction(|tx| {
        let mut record = anamnese.clone();
        record.status = "concluida".to_string();
        let updated = tx.update_anamnese(record, Some("org_1")).unwrap().unwrap();
        assert_eq!(updated.status, "concluida");

        assert!(!tx.delete_anamnese(anamnese.id, Some("org_2")).unwrap());
        assert!(tx.delete_anamnese(anamnese.id, Some("org_1")).unwrap());
        assert!(tx.list_anamnese_items(anamnese.id).unwrap().is_empty());
        assert!(tx.get_anamnese(anamnese.id, None).unwrap().is_none());

        Ok(())
    })
    .unwrap();
}
