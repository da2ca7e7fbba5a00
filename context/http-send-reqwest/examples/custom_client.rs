use anyhow::Result;
use bytes::Bytes;
use documentdb_core::Context;
use documentdb_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // Timeouts and pooling live in the transport, not in the documentdb client.
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let endpoint = std::env::var("DOCUMENTDB_ENDPOINT")
        .unwrap_or_else(|_| "https://localhost:8081".to_string());
    let req = http::Request::get(format!("{}/", endpoint.trim_end_matches('/')))
        .body(Bytes::new())?;

    match ctx.http_send(req).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            for (name, value) in resp.headers() {
                println!("  {name}: {value:?}");
            }
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    Ok(())
}
