use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use netls::{app, AppState, OPERATOR_HEADER};
use pretty_assertions::assert_eq;
use sea_orm::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn setup() -> Router {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    app(
        AppState {
            conn,
            page_size: 10,
        },
        "/v1",
    )
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Value {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(OPERATOR_HEADER, "alice")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn vendor_envelopes() {
    let app = setup().await;

    let added = call(
        &app,
        "POST",
        "/v1/netls/vendor/",
        Some(json!({ "comp_fullname": "Acme Networks" })),
    )
    .await;
    assert_eq!(added["code"], 0);
    assert_eq!(added["message"], "Ok");
    assert_eq!(added["data"]["comp_name"], "Acme Networks");
    assert_eq!(added["data"]["created_by"], "alice");
    let id = added["data"]["id"].as_i64().unwrap();

    let dup = call(
        &app,
        "POST",
        "/v1/netls/vendor/",
        Some(json!({ "comp_fullname": "Acme Networks" })),
    )
    .await;
    assert_eq!(dup["code"], 203);
    assert_eq!(dup["data"], Value::Null);

    let missing = call(&app, "GET", "/v1/netls/vendor/?id=99", None).await;
    assert_eq!(missing["code"], 202);

    let no_id = call(&app, "GET", "/v1/netls/vendor/", None).await;
    assert_eq!(no_id["code"], 201);

    let renamed = call(
        &app,
        "PUT",
        "/v1/netls/vendor/",
        Some(json!({ "id": id, "contact": "Bo" })),
    )
    .await;
    assert_eq!(renamed["code"], 0);
    assert_eq!(renamed["data"]["contact"], "Bo");

    let listed = call(&app, "GET", "/v1/netls/vendor/list?name=acme", None).await;
    assert_eq!(listed["data"]["count"], 1);

    let deleted = call(
        &app,
        "DELETE",
        "/v1/netls/vendor/list",
        Some(json!({ "id_list": [id] })),
    )
    .await;
    assert_eq!(deleted["data"], 1);
}

#[tokio::test]
async fn malformed_body_is_a_parameter_error() {
    let app = setup().await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/netls/ipaddr/")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 201);

    let bad_flag = call(
        &app,
        "POST",
        "/v1/netls/ipaddr/",
        Some(json!({ "ipaddr": "10.0.0.1", "flag": 5 })),
    )
    .await;
    assert_eq!(bad_flag["code"], 201);
}

#[tokio::test]
async fn ip_resources_over_http() {
    let app = setup().await;

    let range = call(
        &app,
        "POST",
        "/v1/netls/ipaddr/",
        Some(json!({ "ipaddr": "192.168.10.1~192.168.10.4", "flag": 0, "vlan_id": "10" })),
    )
    .await;
    assert_eq!(range["code"], 0);
    assert_eq!(range["data"]["ipaddr"], "192.168.10.1~4");
    assert_eq!(range["data"]["category"], 2);
    let id = range["data"]["id"].as_i64().unwrap();

    let backwards = call(
        &app,
        "POST",
        "/v1/netls/ipaddr/",
        Some(json!({ "ipaddr": "192.168.10.9~2" })),
    )
    .await;
    assert_eq!(backwards["code"], 201);
    assert_eq!(backwards["message"], "range start greater than end");

    let hosts = call(
        &app,
        "GET",
        &format!("/v1/netls/ipaddr/expand/list?ipaddr_id={id}&is_assigned=-1"),
        None,
    )
    .await;
    assert_eq!(hosts["data"]["count"], 4);

    let assigned = call(
        &app,
        "PUT",
        "/v1/netls/ipaddr/",
        Some(json!({ "id": id, "is_assigned": true })),
    )
    .await;
    assert_eq!(assigned["data"]["is_assigned"], true);

    let hosts = call(
        &app,
        "GET",
        &format!("/v1/netls/ipaddr/expand/list?ipaddr_id={id}&is_assigned=1&page=1&page_size=3"),
        None,
    )
    .await;
    assert_eq!(hosts["data"]["count"], 4);
    assert_eq!(hosts["data"]["list"].as_array().unwrap().len(), 3);

    let first = hosts["data"]["list"][0]["id"].as_i64().unwrap();
    let batch = call(
        &app,
        "PUT",
        "/v1/netls/ipaddr/expand/batch",
        Some(json!([
            { "id": first, "relate_inf": "eth0" },
            { "id": 9999, "relate_inf": "eth1" }
        ])),
    )
    .await;
    assert_eq!(batch["data"], 1);

    let inner = call(&app, "GET", "/v1/netls/ipaddr/list?flag=0&vlan_id=10", None).await;
    assert_eq!(inner["data"]["count"], 1);

    let summary = call(&app, "GET", "/v1/netls/statistics", None).await;
    assert_eq!(summary["data"]["inner"]["total"], 4);
    assert_eq!(summary["data"]["inner"]["assigned"], 4);

    let deleted = call(&app, "DELETE", &format!("/v1/netls/ipaddr/?id={id}"), None).await;
    assert_eq!(deleted["data"], 1);
    let hosts = call(
        &app,
        "GET",
        &format!("/v1/netls/ipaddr/expand/list?ipaddr_id={id}"),
        None,
    )
    .await;
    assert_eq!(hosts["data"]["count"], 0);
}

#[tokio::test]
async fn vlan_defaults_over_http() {
    let app = setup().await;

    let vlan = call(
        &app,
        "POST",
        "/v1/netls/vlanid/",
        Some(json!({ "vlan_id": "42" })),
    )
    .await;
    assert_eq!(vlan["data"]["name"], "Vlan-42");

    let bad = call(
        &app,
        "POST",
        "/v1/netls/vlanid/",
        Some(json!({ "vlan_id": "4097" })),
    )
    .await;
    assert_eq!(bad["code"], 201);
}
