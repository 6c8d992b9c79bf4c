use std::env;
use std::time::Duration;

use http::StatusCode;
use log::{debug, warn};
use tinyoss_aliyun_oss::{Client, Config, PutOptions, SignatureUrlOptions};
use tinyoss_core::{Context, OsEnv, Result};
use tinyoss_file_read_tokio::TokioFileRead;
use tinyoss_http_send_reqwest::ReqwestHttpSend;

fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("TINYOSS_ALIYUN_OSS_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config {
        secure: true,
        ..Default::default()
    }
    .from_env(&ctx);

    Some(Client::new(ctx, config).expect("client must be created from env"))
}

#[tokio::test]
async fn test_put_and_read_back() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("TINYOSS_ALIYUN_OSS_TEST is not set, skipped");
        return Ok(());
    };

    let resp = client
        .put(
            "tinyoss/hello.txt",
            "Hello, OSS!",
            PutOptions::default().with_content_type("text/plain"),
        )
        .await?;
    debug!("put response: {resp:?}");
    assert_eq!(resp.status(), StatusCode::OK);

    let url = client.signature_url("tinyoss/hello.txt", &SignatureUrlOptions::default())?;
    let resp = reqwest::get(&url).await.expect("request must succeed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body must be text"), "Hello, OSS!");
    Ok(())
}

#[tokio::test]
async fn test_put_symlink() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("TINYOSS_ALIYUN_OSS_TEST is not set, skipped");
        return Ok(());
    };

    client
        .put("tinyoss/target file.txt", "target", PutOptions::default())
        .await?;
    let resp = client
        .put_symlink("tinyoss/link.txt", "tinyoss/target file.txt")
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let url = client.signature_url("tinyoss/link.txt", &SignatureUrlOptions::default())?;
    let body = reqwest::get(&url)
        .await
        .expect("request must succeed")
        .text()
        .await
        .expect("body must be text");
    assert_eq!(body, "target");
    Ok(())
}

#[tokio::test]
async fn test_expired_signature_url() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("TINYOSS_ALIYUN_OSS_TEST is not set, skipped");
        return Ok(());
    };

    let url = client.signature_url(
        "tinyoss/hello.txt",
        &SignatureUrlOptions::default().with_expires(Duration::from_secs(1)),
    )?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let resp = reqwest::get(&url).await.expect("request must succeed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}
