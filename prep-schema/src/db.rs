use mongodb::{Client, Collection, Database, bson::doc, options::ClientOptions};
use serde::{Deserialize, Serialize};

/// Database named in the connection URI.
pub fn database(client: &Client) -> Database {
    client
        .default_database()
        .expect("database needs to be defined in the URI")
}

pub fn get_collection<'d, T>(client: &Client, collection_name: &str) -> Collection<T>
where
    T: Send + Sync + Deserialize<'d> + Serialize,
{
    database(client).collection::<T>(collection_name)
}

/// Connects to `uri` and pings its database.
pub async fn client(uri: &str) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(uri).await?;
    client_options.app_name = Some(env!("CARGO_CRATE_NAME").to_string());

    let client = Client::with_options(client_options)?;
    database(&client).run_command(doc! { "ping": 1 }).await?;

    Ok(client)
}
