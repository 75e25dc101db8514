use std::sync::Arc;

use actix_web::body::to_bytes;
use actix_web::http::{Method, StatusCode};
use actix_web::test::TestRequest;
use actix_web::HttpResponse;
use serde_json::{json, Value};

use ocupacional::config::CommonConfig;
use ocupacional::server::authn::token::config::{StaticToken, TokenProvider};
use ocupacional::server::config::ServerConfig;
use ocupacional::server::factory::ServerFactory;
use ocupacional::server::handlers::Handler;
use ocupacional::server::restful::RestfulContext;

fn static_token(token: &str, principal: &str, role: Option<&str>, org: Option<&str>) -> StaticToken {
    StaticToken {
        token: token.to_string(),
        principal: principal.to_string(),
        role: role.map(String::from),
        org: org.map(String::from),
    }
}

/// Builds a full server context backed by an in-memory database, a static
/// token table and a static organization registry.
fn test_context() -> Arc<RestfulContext> {
    let mut cfg = ServerConfig::default();
    cfg.db.sqlite.memory = true;

    cfg.authn.token.provider = TokenProvider::Static;
    cfg.authn.token.static_tokens = vec![
        static_token("tok-viewer1", "viviane", Some("viewer"), Some("org_1")),
        static_token("tok-editor1", "edson", Some("editor"), Some("org_1")),
        static_token("tok-admin1", "alice", Some("admin"), Some("org_1")),
        static_token("tok-admin2", "amanda", Some("admin"), Some("org_2")),
        static_token("tok-root", "root", Some("super_admin"), None),
        static_token("tok-norole", "nina", None, Some("org_1")),
        static_token("tok-noorg", "otto", Some("admin"), None),
        static_token("tok-ghost", "gil", Some("admin"), Some("org_ghost")),
    ];

    cfg.registry.orgs = [
        ("org_1".to_string(), "Clínica Vida".to_string()),
        ("org_2".to_string(), "Ambulatório Azul".to_string()),
    ]
    .into_iter()
    .collect();

    let factory = ServerFactory::new(cfg).unwrap();
    factory.build_context().unwrap()
}

async fn call(
    ctx: &RestfulContext,
    token: Option<&str>,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = TestRequest::default().method(method);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    let http_req = req.to_http_request();
    let body = body.map(|value| value.to_string().into_bytes());

    let resp: HttpResponse = ctx.api_handler.handle(path, http_req, body).into();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

async fn create_client(ctx: &RestfulContext, token: &str, razao_social: &str, cpf: &str) -> Value {
    let (status, resp) = call(
        ctx,
        Some(token),
        Method::PUT,
        "clients",
        Some(json!({"razaoSocial": razao_social, "cpf": cpf})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create client: {resp}");
    resp["data"].clone()
}

#[tokio::test]
async fn test_client_round_trip_and_isolation() {
    let ctx = test_context();

    let created = create_client(&ctx, "tok-admin1", "Acme Ltda", "12345678000190").await;
    assert_eq!(created["razaoSocial"], "Acme Ltda");
    assert_eq!(created["cpf"], "12345678000190");
    assert_eq!(created["organizationId"], "org_1");

    // Listing within the owning organization returns exactly one row
    let (status, resp) = call(&ctx, Some("tok-admin1"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = resp["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["razaoSocial"], "Acme Ltda");
    assert_eq!(resp["data"]["total"], 1);
    assert_eq!(resp["data"]["totalPages"], 1);

    // Another organization sees nothing
    let (status, resp) = call(&ctx, Some("tok-admin2"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(resp["data"]["total"], 0);

    // Guessing the row id from another organization looks like a missing row
    let id = created["id"].as_u64().unwrap();
    let (status, resp) = call(
        &ctx,
        Some("tok-admin2"),
        Method::GET,
        &format!("clients/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["kind"], "NotFound");
}

#[tokio::test]
async fn test_cross_org_delete_is_not_found_and_keeps_row() {
    let ctx = test_context();

    let created = create_client(&ctx, "tok-admin1", "Acme Ltda", "12345678000190").await;
    let id = created["id"].as_u64().unwrap();

    // NotFound, never Forbidden, and the row survives
    let (status, resp) = call(
        &ctx,
        Some("tok-admin2"),
        Method::DELETE,
        &format!("clients/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["kind"], "NotFound");

    let (status, _) = call(
        &ctx,
        Some("tok-admin1"),
        Method::GET,
        &format!("clients/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_editor_can_update_but_not_delete() {
    let ctx = test_context();

    let (status, resp) = call(
        &ctx,
        Some("tok-editor1"),
        Method::PUT,
        "medicos",
        Some(json!({"nome": "Dr. Carlos Lima", "crm": "CRM/SP 123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    let id = resp["data"]["id"].as_u64().unwrap();

    let (status, resp) = call(
        &ctx,
        Some("tok-editor1"),
        Method::PATCH,
        &format!("medicos/{id}"),
        Some(json!({"especialidade": "Medicina do Trabalho"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["especialidade"], "Medicina do Trabalho");

    let (status, resp) = call(
        &ctx,
        Some("tok-editor1"),
        Method::DELETE,
        &format!("medicos/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["kind"], "Forbidden");
}

#[tokio::test]
async fn test_viewer_is_read_only() {
    let ctx = test_context();
    create_client(&ctx, "tok-admin1", "Acme Ltda", "12345678000190").await;

    let (status, _) = call(&ctx, Some("tok-viewer1"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = call(
        &ctx,
        Some("tok-viewer1"),
        Method::PUT,
        "clients",
        Some(json!({"razaoSocial": "Nope", "cpf": "12345678000190"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["kind"], "Forbidden");

    // Unrecognized role claims degrade to viewer
    let (status, _) = call(&ctx, Some("tok-norole"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(
        &ctx,
        Some("tok-norole"),
        Method::DELETE,
        "clients/1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_authn_and_org_requirements() {
    let ctx = test_context();

    // No credentials at all
    let (status, resp) = call(&ctx, None, Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["kind"], "Unauthenticated");

    // Unknown token
    let (status, _) = call(&ctx, Some("tok-bogus"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Authenticated but without an active organization
    let (status, resp) = call(&ctx, Some("tok-noorg"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["kind"], "NoActiveOrganization");

    // super_admin works without an organization
    let (status, _) = call(&ctx, Some("tok-root"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_validation_errors() {
    let ctx = test_context();

    let (status, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "clients",
        Some(json!({"razaoSocial": "", "cpf": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["kind"], "InvalidInput");
    let field_errors = resp["fieldErrors"].as_array().unwrap();
    assert_eq!(field_errors.len(), 2);
    assert_eq!(field_errors[0]["field"], "razaoSocial");
    assert_eq!(field_errors[1]["field"], "cpf");

    // Colaborador referencing a client of another organization is invalid
    let other = create_client(&ctx, "tok-admin2", "Cunha Metalúrgica", "11222333000181").await;
    let (status, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "colaboradores",
        Some(json!({
            "nome": "Maria Souza",
            "cpf": "52998224725",
            "dataNascimento": "1990-05-17",
            "funcao": "Soldadora",
            "clientId": other["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["kind"], "InvalidInput");
    assert_eq!(resp["fieldErrors"][0]["field"], "clientId");
}

#[tokio::test]
async fn test_pagination_normalizes_low_pages() {
    let ctx = test_context();
    for i in 0..3 {
        create_client(
            &ctx,
            "tok-admin1",
            &format!("Empresa {i}"),
            "12345678000190",
        )
        .await;
    }

    let (_, page1) = call(
        &ctx,
        Some("tok-admin1"),
        Method::GET,
        "clients",
        Some(json!({"page": 1})),
    )
    .await;
    let (_, page0) = call(
        &ctx,
        Some("tok-admin1"),
        Method::GET,
        "clients",
        Some(json!({"page": 0})),
    )
    .await;
    let (_, negative) = call(
        &ctx,
        Some("tok-admin1"),
        Method::GET,
        "clients",
        Some(json!({"page": -2})),
    )
    .await;

    assert_eq!(page1["data"]["items"], page0["data"]["items"]);
    assert_eq!(page1["data"]["items"], negative["data"]["items"]);
    assert_eq!(page0["data"]["page"], 1);
    assert_eq!(page0["data"]["totalPages"], 1);
}

#[tokio::test]
async fn test_org_listing_by_role() {
    let ctx = test_context();

    // Writes lazily provision both organizations from the registry
    create_client(&ctx, "tok-admin1", "Acme Ltda", "12345678000190").await;
    create_client(&ctx, "tok-admin2", "Cunha Metalúrgica", "11222333000181").await;

    // super_admin sees every organization, ordered by name
    let (status, resp) = call(&ctx, Some("tok-root"), Method::GET, "orgs", None).await;
    assert_eq!(status, StatusCode::OK);
    let orgs = resp["data"].as_array().unwrap();
    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0]["name"], "Ambulatório Azul");
    assert_eq!(orgs[1]["name"], "Clínica Vida");

    // Everyone else only sees their own organization
    let (status, resp) = call(&ctx, Some("tok-viewer1"), Method::GET, "orgs", None).await;
    assert_eq!(status, StatusCode::OK);
    let orgs = resp["data"].as_array().unwrap();
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0]["id"], "org_1");

    // Organizations cannot be created or deleted through the API
    let (status, _) = call(
        &ctx,
        Some("tok-root"),
        Method::PUT,
        "orgs",
        Some(json!({"id": "org_9", "name": "Nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = call(&ctx, Some("tok-root"), Method::DELETE, "orgs/org_1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_org_sync_failure_blocks_writes() {
    let ctx = test_context();

    // org_ghost is not in the registry: the write aborts and nothing is stored
    let (status, resp) = call(
        &ctx,
        Some("tok-ghost"),
        Method::PUT,
        "clients",
        Some(json!({"razaoSocial": "Fantasma SA", "cpf": "12345678000190"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["kind"], "Internal");
    let message = resp["message"].as_str().unwrap();
    assert!(message.contains("Could not verify organization"), "{message}");

    // Reads still work (sync only runs for writes), and show no leaked row
    let (status, resp) = call(&ctx, Some("tok-ghost"), Method::GET, "clients", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["total"], 0);
}

#[tokio::test]
async fn test_anamnese_price_snapshot() {
    let ctx = test_context();

    let client = create_client(&ctx, "tok-admin1", "Acme Ltda", "12345678000190").await;
    let client_id = client["id"].as_u64().unwrap();

    let (_, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "medicos",
        Some(json!({"nome": "Dr. Carlos Lima", "crm": "CRM/SP 123456"})),
    )
    .await;
    let medico_id = resp["data"]["id"].as_u64().unwrap();

    let (_, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "exames",
        Some(json!({"nome": "Audiometria", "valor": 5000})),
    )
    .await;
    let audiometria = resp["data"]["id"].as_u64().unwrap();
    let (_, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "exames",
        Some(json!({"nome": "Acuidade Visual", "valor": 3000})),
    )
    .await;
    let acuidade = resp["data"]["id"].as_u64().unwrap();

    // Client-specific override for audiometria only
    let (status, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "exames-cli",
        Some(json!({"clientId": client_id, "exameId": audiometria, "valor": 4200})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{resp}");

    // A second override for the same pair conflicts
    let (status, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "exames-cli",
        Some(json!({"clientId": client_id, "exameId": audiometria, "valor": 4300})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["kind"], "Conflict");

    let (_, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "colaboradores",
        Some(json!({
            "nome": "Maria Souza",
            "cpf": "52998224725",
            "dataNascimento": "1990-05-17",
            "funcao": "Soldadora",
            "clientId": client_id,
        })),
    )
    .await;
    let colaborador_id = resp["data"]["id"].as_u64().unwrap();

    let (status, resp) = call(
        &ctx,
        Some("tok-admin1"),
        Method::PUT,
        "anamneses",
        Some(json!({
            "colaboradorId": colaborador_id,
            "medicoId": medico_id,
            "tipo": "admissional",
            "exames": [audiometria, acuidade],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    let anamnese = &resp["data"];
    assert_eq!(anamnese["status"], "pendente");
    let items = anamnese["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["valor"], 4200); // override price
    assert_eq!(items[1]["valor"], 3000); // catalog price
}

#[tokio::test]
async fn test_whoami_and_cani() {
    let ctx = test_context();

    let (status, resp) = call(&ctx, Some("tok-editor1"), Method::GET, "whoami", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["principal"], "edson");
    assert_eq!(resp["data"]["role"], "editor");
    assert_eq!(resp["data"]["organizationId"], "org_1");

    let (status, resp) = call(
        &ctx,
        Some("tok-editor1"),
        Method::GET,
        "cani/delete/clients",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["allow"], false);

    let (_, resp) = call(
        &ctx,
        Some("tok-editor1"),
        Method::GET,
        "cani/update/clients",
        None,
    )
    .await;
    assert_eq!(resp["data"]["allow"], true);
}
