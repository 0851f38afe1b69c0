use anyhow::Result;
use httpmock::prelude::*;
use jiandaoyun_connector::domain::ports::ParameterProvider;
use jiandaoyun_connector::{
    Credential, Item, NodeRunner, Operation, Parameters, ReqwestTransport, Resource,
    StaticParameters,
};
use serde_json::json;

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(Credential::new(server.base_url(), "test-key")).unwrap()
}

/// 每個 item 可以有不同的參數（host 端會對每個 item 重新解析表達式）
struct PerItemParameters(Vec<Parameters>);

impl ParameterProvider for PerItemParameters {
    fn parameters(&self, item_index: usize) -> jiandaoyun_connector::Result<Parameters> {
        Ok(self.0[item_index].clone())
    }
}

#[tokio::test]
async fn test_get_single_record_sends_bearer_and_exact_body() -> Result<()> {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/entry/data/get")
            .header("authorization", "Bearer test-key")
            .json_body(json!({ "app_id": "a", "entry_id": "e", "data_id": "d" }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({ "data": { "_id": "d", "_widget_1": { "value": 42 } } }));
    });

    let params = Parameters::from_value(json!({ "appId": "a", "entryId": "e", "dataId": "d" }))?;
    let runner = NodeRunner::new(
        Resource::Data,
        Operation::GetSingleDataRecord,
        transport_for(&server),
        StaticParameters(params),
    );

    let output = runner.run(&[Item::default()]).await?;

    api_mock.assert();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["data"]["_id"], json!("d"));
    assert_eq!(output[0].paired_item, Some(0));
    Ok(())
}

#[tokio::test]
async fn test_get_apps_object_response_maps_to_single_item() -> Result<()> {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/list")
            .json_body(json!({ "skip": 0, "limit": 2 }));
        then.status(200)
            .json_body(json!({ "apps": [{ "app_id": "a1" }, { "app_id": "a2" }] }));
    });

    let params = Parameters::from_value(json!({ "returnCount": 2 }))?;
    let runner = NodeRunner::new(
        Resource::App,
        Operation::GetApps,
        transport_for(&server),
        StaticParameters(params),
    );

    let output = runner.run(&[Item::default()]).await?;

    api_mock.assert();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["apps"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_continue_on_fail_produces_one_output_per_input() -> Result<()> {
    let server = MockServer::start();

    let good_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/entry/data/get")
            .json_body(json!({ "app_id": "a", "entry_id": "e", "data_id": "good" }));
        then.status(200).json_body(json!({ "data": { "_id": "good" } }));
    });
    let bad_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/entry/data/get")
            .json_body(json!({ "app_id": "a", "entry_id": "e", "data_id": "bad" }));
        then.status(404).body("data not found");
    });

    let per_item = PerItemParameters(vec![
        Parameters::from_value(json!({ "appId": "a", "entryId": "e", "dataId": "good" }))?,
        Parameters::from_value(json!({ "appId": "a", "entryId": "e", "dataId": "bad" }))?,
    ]);
    let runner = NodeRunner::new(
        Resource::Data,
        Operation::GetSingleDataRecord,
        transport_for(&server),
        per_item,
    )
    .continue_on_fail(true);

    let output = runner.run(&[Item::default(), Item::default()]).await?;

    good_mock.assert();
    bad_mock.assert();
    assert_eq!(output.len(), 2);
    assert_eq!(output[0].json["data"]["_id"], json!("good"));
    assert_eq!(output[0].paired_item, Some(0));
    let error = output[1].json["error"].as_str().unwrap();
    assert!(error.contains("404"), "unexpected error message: {}", error);
    assert_eq!(output[1].paired_item, Some(1));
    Ok(())
}

#[tokio::test]
async fn test_abort_mode_stops_the_batch() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/api/v5/app/entry/data/get");
        then.status(500).body("internal error");
    });

    let params = Parameters::from_value(json!({ "appId": "a", "entryId": "e", "dataId": "d" }))?;
    let runner = NodeRunner::new(
        Resource::Data,
        Operation::GetSingleDataRecord,
        transport_for(&server),
        StaticParameters(params),
    );

    let result = runner.run(&[Item::default(), Item::default()]).await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn test_create_record_additional_fields_reach_the_wire() -> Result<()> {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/entry/data/create")
            .json_body(json!({
                "app_id": "a",
                "entry_id": "e",
                "data": { "_widget_1": { "value": 1 } },
                "is_start_trigger": false,
                "transaction_id": "txn-1",
            }));
        then.status(200).json_body(json!({ "data": { "_id": "new" } }));
    });

    let params = Parameters::from_value(json!({
        "appId": "a",
        "entryId": "e",
        "dataRecordJson": "{\"_widget_1\": {\"value\": 1}}",
        "additionalFields": { "isStartTrigger": false, "transactionId": "txn-1" },
    }))?;
    let runner = NodeRunner::new(
        Resource::Data,
        Operation::CreateDataRecord,
        transport_for(&server),
        StaticParameters(params),
    );

    let output = runner.run(&[Item::default()]).await?;

    api_mock.assert();
    assert_eq!(output[0].json["data"]["_id"], json!("new"));
    Ok(())
}
