use anyhow::Result;
use documentdb::{CallOption, Client, Config, Consistency, DocumentDb, DocumentIterator, Query};
use documentdb_core::{Context, OsEnv};
use documentdb_http_send_reqwest::ReqwestHttpSend;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct User {
    id: String,
    #[serde(default)]
    email: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().try_init();
    let _ = dotenv::dotenv();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::default()
        .with_user_agent("documentdb-example/0.1")
        .from_env(&ctx);
    let db = DocumentDb::new(Client::from_config(ctx, config)?);

    let coll = std::env::var("DOCUMENTDB_COLLECTION")
        .unwrap_or_else(|_| "dbs/mydb/colls/users".to_string());
    let query = Query::new("SELECT * FROM root r WHERE r.active = @active")
        .with_parameter("@active", true);

    let mut iter = DocumentIterator::<User>::new(
        coll,
        query,
        vec![
            CallOption::Limit(50),
            CallOption::CrossPartition,
            CallOption::ConsistencyLevel(Consistency::Eventual),
        ],
    );

    let mut total = 0;
    while let Some(users) = iter.next_page(&db).await? {
        for user in &users {
            println!("{}: {}", user.id, user.email);
        }
        total += users.len();
    }
    println!("{total} users");

    Ok(())
}
