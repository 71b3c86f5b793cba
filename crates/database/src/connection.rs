use crate::error::DbError;
use crate::repository::PersonRepository;
use configuration::DatabaseSettings;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;
use std::time::Duration;

/// Establishes the process-wide MongoDB client.
///
/// The driver connects lazily, so a `ping` is sent to surface a bad URI or an
/// unreachable server at startup rather than on the first query. The returned
/// client is cheap to clone and should be shared across the entire application.
pub async fn connect(settings: &DatabaseSettings) -> Result<Client, DbError> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;
    options.app_name = Some(settings.app_name.clone());
    options.server_selection_timeout = Some(Duration::from_secs(settings.server_selection_timeout_secs));
    options.connect_timeout = Some(Duration::from_secs(settings.connect_timeout_secs));

    let client = Client::with_options(options)
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;

    client
        .database(&settings.name)
        .run_command(doc! { "ping": 1 })
        .await?;

    tracing::info!(database = %settings.name, "Connected to MongoDB.");
    Ok(client)
}

/// Connects and returns a repository bound to the configured collection.
pub async fn open_repository(settings: &DatabaseSettings) -> Result<PersonRepository, DbError> {
    let client = connect(settings).await?;
    Ok(PersonRepository::from_client(&client, settings))
}
