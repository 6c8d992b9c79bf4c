use std::time::Duration;

use anyhow::Result;
use http::Method;
use tinyoss_aliyun_oss::{Client, Config, PutOptions, SignatureUrlOptions};
use tinyoss_core::{Context, OsEnv};
use tinyoss_file_read_tokio::TokioFileRead;
use tinyoss_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    // Credentials and bucket come from ALIBABA_CLOUD_* env values.
    let config = Config {
        secure: true,
        timeout: Duration::from_secs(30),
        ..Default::default()
    }
    .from_env(&ctx);
    println!("Using config: {config:?}");

    let client = Client::new(ctx, config)?;
    println!("Talking to {}", client.host());

    // Example 1: Upload an object with progress
    println!("\nExample 1: Upload an object");
    let opts = PutOptions::default()
        .with_content_type("text/plain")
        .with_progress(|p: f64| println!("  uploaded {p}%"));
    match client.put("examples/hello.txt", "Hello, OSS!", opts).await {
        Ok(resp) => println!("Upload finished: {}", resp.status()),
        Err(e) => eprintln!("Upload failed: {e}"),
    }

    // Example 2: Create a symlink
    println!("\nExample 2: Create a symlink");
    match client
        .put_symlink("examples/latest.txt", "examples/hello.txt")
        .await
    {
        Ok(resp) => println!("Symlink created: {}", resp.status()),
        Err(e) => eprintln!("Symlink failed: {e}"),
    }

    // Example 3: Share the object as a download
    println!("\nExample 3: Generate a download url");
    let url = client.signature_url(
        "examples/hello.txt",
        &SignatureUrlOptions::default()
            .with_expires(Duration::from_secs(3600))
            .with_response("content-disposition", "attachment; filename=hello.txt"),
    )?;
    println!("Download url: {url}");

    // Example 4: Let someone else upload with a signed url
    println!("\nExample 4: Generate an upload url");
    let url = client.signature_url(
        "examples/upload.bin",
        &SignatureUrlOptions::default()
            .with_method(Method::PUT)
            .with_extra("Content-Type", "application/octet-stream"),
    )?;
    println!("Upload url: {url}");

    // Example 5: Build a signed request for another transport
    println!("\nExample 5: Build a signed request");
    let req = client.build_put_request(
        "examples/raw.txt",
        "raw body".into(),
        &PutOptions::default(),
    )?;
    for (name, value) in req.headers() {
        println!("  {name}: {value:?}");
    }

    Ok(())
}
