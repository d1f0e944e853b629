use ethers::abi::Token;
use ethers::types::{Address, H256, U256};
use mockito::Matcher;
use nft_fighters::deploy::SourceVerifier;
use nft_fighters::error::FightersError;
use nft_fighters::models::{DeployedContract, VerificationStatus};
use nft_fighters::services::{ArtifactStore, EtherscanVerifier};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn write_json(path: &Path, value: serde_json::Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, value.to_string()).unwrap();
}

fn artifacts_fixture() -> PathBuf {
    let root = std::env::temp_dir().join(format!("nft-fighters-etherscan-{}", uuid::Uuid::new_v4()));
    let dir = root.join("contracts/Fight.sol");
    write_json(
        &dir.join("Fight.json"),
        json!({
            "contractName": "Fight",
            "sourceName": "contracts/Fight.sol",
            "abi": [],
            "bytecode": "0x6080"
        }),
    );
    write_json(&dir.join("Fight.dbg.json"), json!({ "buildInfo": "../../build-info/f1.json" }));
    write_json(
        &root.join("build-info/f1.json"),
        json!({ "solcLongVersion": "0.8.7+commit.e28d00a7", "input": { "language": "Solidity" } }),
    );
    root
}

fn fight() -> DeployedContract {
    DeployedContract {
        contract: "Fight".to_string(),
        address: Address::repeat_byte(0xab),
        chain_id: 5,
        args: vec![Token::Uint(U256::from(1u64))],
        transaction_hash: H256::zero(),
        block_number: Some(10),
    }
}

fn verifier(server: &mockito::Server, artifacts: &Path) -> EtherscanVerifier {
    EtherscanVerifier::new(
        format!("{}/api", server.url()),
        "KEY".to_string(),
        ArtifactStore::new(artifacts),
    )
    .with_polling(Duration::ZERO, 3)
}

#[tokio::test]
async fn submits_sources_then_polls_until_verified() {
    let mut server = mockito::Server::new_async().await;
    let artifacts = artifacts_fixture();

    let submit = server
        .mock("POST", "/api")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "verifysourcecode".into()),
            Matcher::UrlEncoded("contractname".into(), "contracts/Fight.sol:Fight".into()),
            Matcher::UrlEncoded("compilerversion".into(), "v0.8.7+commit.e28d00a7".into()),
            Matcher::UrlEncoded(
                "constructorArguements".into(),
                format!("{:064x}", 1),
            ),
        ]))
        .with_body(r#"{"status":"1","message":"OK","result":"guid-1"}"#)
        .create_async()
        .await;
    let check = server
        .mock("POST", "/api")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "checkverifystatus".into()),
            Matcher::UrlEncoded("guid".into(), "guid-1".into()),
        ]))
        .with_body(r#"{"status":"1","message":"OK","result":"Pass - Verified"}"#)
        .create_async()
        .await;

    let status = verifier(&server, &artifacts).verify(&fight()).await.unwrap();

    assert_eq!(status, VerificationStatus::Verified);
    submit.assert_async().await;
    check.assert_async().await;
    std::fs::remove_dir_all(artifacts).ok();
}

#[tokio::test]
async fn already_verified_source_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let artifacts = artifacts_fixture();

    server
        .mock("POST", "/api")
        .with_body(r#"{"status":"0","message":"NOTOK","result":"Contract source code already verified"}"#)
        .create_async()
        .await;

    let status = verifier(&server, &artifacts).verify(&fight()).await.unwrap();

    assert_eq!(status, VerificationStatus::AlreadyVerified);
    std::fs::remove_dir_all(artifacts).ok();
}

#[tokio::test]
async fn failed_verification_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let artifacts = artifacts_fixture();

    server
        .mock("POST", "/api")
        .match_body(Matcher::UrlEncoded("action".into(), "verifysourcecode".into()))
        .with_body(r#"{"status":"1","message":"OK","result":"guid-2"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/api")
        .match_body(Matcher::UrlEncoded("action".into(), "checkverifystatus".into()))
        .with_body(r#"{"status":"0","message":"NOTOK","result":"Fail - Unable to verify"}"#)
        .create_async()
        .await;

    let err = verifier(&server, &artifacts).verify(&fight()).await.unwrap_err();

    assert!(matches!(err, FightersError::VerificationFailed(reason) if reason.starts_with("Fail")));
    std::fs::remove_dir_all(artifacts).ok();
}

#[tokio::test]
async fn pending_forever_gives_up_after_max_checks() {
    let mut server = mockito::Server::new_async().await;
    let artifacts = artifacts_fixture();

    server
        .mock("POST", "/api")
        .match_body(Matcher::UrlEncoded("action".into(), "verifysourcecode".into()))
        .with_body(r#"{"status":"1","message":"OK","result":"guid-3"}"#)
        .create_async()
        .await;
    let check = server
        .mock("POST", "/api")
        .match_body(Matcher::UrlEncoded("action".into(), "checkverifystatus".into()))
        .with_body(r#"{"status":"0","message":"NOTOK","result":"Pending in queue"}"#)
        .expect(3)
        .create_async()
        .await;

    let err = verifier(&server, &artifacts).verify(&fight()).await.unwrap_err();

    assert!(matches!(err, FightersError::VerificationFailed(_)));
    check.assert_async().await;
    std::fs::remove_dir_all(artifacts).ok();
}
