//! Shared setup for tests that need a live MongoDB server.

use configuration::DatabaseSettings;
use database::{connect, PersonRepository};

pub struct TestDb {
    pub repo: PersonRepository,
}

impl TestDb {
    /// Connects to `MONGO_URI` and binds a fresh, uniquely named collection.
    ///
    /// Panics when `MONGO_URI` is not set: callers are `#[ignore]`d tests that
    /// only run on request, so a missing server must fail rather than pass.
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let uri = std::env::var("MONGO_URI")
            .expect("MONGO_URI must be set to run the database integration tests");

        let settings = DatabaseSettings {
            uri,
            name: "people_store_test".to_string(),
            collection: format!("people_{}", uuid::Uuid::new_v4().simple()),
            app_name: "people-store-tests".to_string(),
            server_selection_timeout_secs: 5,
            connect_timeout_secs: 5,
        };

        let client = connect(&settings)
            .await
            .expect("MONGO_URI is set but the server is unreachable");
        Self {
            repo: PersonRepository::from_client(&client, &settings),
        }
    }

    pub async fn cleanup(self) {
        self.repo
            .collection()
            .drop()
            .await
            .expect("failed to drop test collection");
    }
}
