use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseSettings,
}

/// Contains everything needed to reach the people collection.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// The MongoDB connection string. Usually supplied through `MONGO_URI`.
    #[serde(default)]
    pub uri: String,
    /// The database holding the collection.
    pub name: String,
    /// The collection holding person documents.
    pub collection: String,
    /// Reported to the server in the connection handshake.
    pub app_name: String,
    /// How long the driver waits for a suitable server before failing an operation.
    pub server_selection_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}
