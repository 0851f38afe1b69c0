use anyhow::Result;
use base64::Engine;
use httpmock::prelude::*;
use jiandaoyun_connector::domain::model::BinaryPayload;
use jiandaoyun_connector::{
    Credential, Item, NodeRunner, Operation, Parameters, ReqwestTransport, Resource,
    StaticParameters,
};
use serde_json::json;

fn transport_for(server: &MockServer) -> ReqwestTransport {
    ReqwestTransport::new(Credential::new(server.base_url(), "test-key")).unwrap()
}

#[tokio::test]
async fn test_get_upload_token_mapping() -> Result<()> {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v5/app/entry/file/get_upload_token")
            .json_body(json!({ "app_id": "a", "entry_id": "e", "transaction_id": "txn-1" }));
        then.status(200).json_body(json!({
            "token_and_url_list": [{ "token": "t-1", "url": server.url("/upload") }]
        }));
    });

    let params = Parameters::from_value(json!({
        "appId": "a",
        "entryId": "e",
        "transactionId": "txn-1",
    }))?;
    let runner = NodeRunner::new(
        Resource::File,
        Operation::GetUploadToken,
        transport_for(&server),
        StaticParameters(params),
    );

    let output = runner.run(&[Item::default()]).await?;

    api_mock.assert();
    assert_eq!(output[0].json["token_and_url_list"][0]["token"], json!("t-1"));
    Ok(())
}

/// 上傳檔案走 multipart，token 與檔案內容都要出現在表單裡
#[tokio::test]
async fn test_upload_file_sends_multipart_form() -> Result<()> {
    let server = MockServer::start();

    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .body_contains("upload-token")
            .body_contains("report.txt")
            .body_contains("hello world");
        then.status(200).json_body(json!({ "status": "success" }));
    });

    let mut item = Item::default();
    item.binary.insert(
        "data".to_string(),
        BinaryPayload {
            data: base64::engine::general_purpose::STANDARD.encode(b"hello world"),
            file_name: Some("report.txt".to_string()),
            mime_type: Some("text/plain".to_string()),
        },
    );

    let params = Parameters::from_value(json!({
        "url": server.url("/upload"),
        "token": "upload-token",
        "binaryPropertyName": "data",
    }))?;
    let runner = NodeRunner::new(
        Resource::File,
        Operation::UploadFile,
        transport_for(&server),
        StaticParameters(params),
    );

    let output = runner.run(&[item]).await?;

    upload_mock.assert();
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].json["status"], json!("success"));
    Ok(())
}

#[tokio::test]
async fn test_upload_file_without_binary_never_hits_the_server() -> Result<()> {
    let server = MockServer::start();

    let upload_mock = server.mock(|when, then| {
        when.method(POST).path("/upload");
        then.status(200).json_body(json!({ "status": "success" }));
    });

    let params = Parameters::from_value(json!({
        "url": server.url("/upload"),
        "token": "upload-token",
        "binaryPropertyName": "attachment",
    }))?;
    let runner = NodeRunner::new(
        Resource::File,
        Operation::UploadFile,
        transport_for(&server),
        StaticParameters(params),
    );

    let err = runner.run(&[Item::default()]).await.unwrap_err();
    assert!(err.to_string().contains("attachment"));
    upload_mock.assert_hits(0);
    Ok(())
}
