mod anamnese;
mod client;
mod conta;
mod org;

use super::Database;

#[test]
fn test_database() {
    let db = Database::new_test();

    org::run_organization_tests(&db);
    client::run_client_tests(&db);
    anamnese::run_anamnese_tests(&db);
    conta::run_conta_tests(&db);
}
