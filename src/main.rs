use anyhow::Context;
use clap::{Parser, Subcommand};
use core_types::{samples, NewPerson};
// Import database types directly from the database crate
use database::connection::open_repository;
use database::repository::PersonRepository;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the people store.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Loads .env, config.toml and MONGO_URI.
    let config = configuration::load_config().context("Failed to load configuration")?;

    let repo = open_repository(&config.database)
        .await
        .context("Failed to connect to the database")?;

    // Execute the appropriate command
    run(cli.command, &repo).await
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Create, read, update and delete people in a MongoDB collection.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the sample people (Maria Souza, Ana and Carlos).
    Seed,
    /// Create one person.
    Create(CreateArgs),
    /// List everyone with exactly this name.
    FindByName { name: String },
    /// Show the first person who likes this food.
    FindByFood { food: String },
    /// Show a person by identifier.
    FindById { id: String },
    /// Add "hamburger" to a person's favorite foods and save them.
    AddHamburger { id: String },
    /// Set the age of the first person with this name to 20.
    SetAge { name: String },
    /// Delete a person by identifier.
    RemoveById { id: String },
    /// Delete everyone with this name.
    RemoveByName {
        #[arg(default_value = database::NAME_TO_REMOVE)]
        name: String,
    },
    /// Up to two people who like this food, sorted by name, without their age.
    QueryChain {
        #[arg(default_value = database::FOOD_TO_SEARCH)]
        food: String,
    },
}

#[derive(Parser)]
struct CreateArgs {
    /// The person's name.
    #[arg(long)]
    name: String,

    #[arg(long)]
    age: Option<i32>,

    /// A favorite food. Repeat the flag for several.
    #[arg(long = "food")]
    foods: Vec<String>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn run(command: Commands, repo: &PersonRepository) -> anyhow::Result<()> {
    match command {
        Commands::Seed => {
            let maria = repo.create_one(samples::maria_souza()).await?;
            let others = repo.create_many(samples::array_of_people()).await?;
            tracing::info!(count = others.len() + 1, "Seeded sample people.");
            print_json(&maria)?;
            print_json(&others)?;
        }
        Commands::Create(args) => {
            let mut person = NewPerson::new(args.name).with_favorite_foods(args.foods);
            person.age = args.age;
            print_json(&repo.create_one(person).await?)?;
        }
        Commands::FindByName { name } => print_json(&repo.find_by_name(&name).await?)?,
        Commands::FindByFood { food } => print_json(&repo.find_one_by_food(&food).await?)?,
        Commands::FindById { id } => print_json(&repo.find_by_id(&id).await?)?,
        Commands::AddHamburger { id } => print_json(&repo.find_edit_then_save(&id).await?)?,
        Commands::SetAge { name } => print_json(&repo.find_and_update_age(&name).await?)?,
        Commands::RemoveById { id } => print_json(&repo.remove_by_id(&id).await?)?,
        Commands::RemoveByName { name } => {
            print_json(&repo.remove_many_by_name(&name).await?)?
        }
        Commands::QueryChain { food } => print_json(&repo.query_chain(&food).await?)?,
    }
    Ok(())
}

/// `None` prints as `null`, matching what the store returned. Identifiers print as
/// bare hex so they can be passed straight to `find-by-id` and friends.
fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(value)?;
    flatten_object_ids(&mut json);
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Rewrites every extended-JSON `{"$oid": "<hex>"}` into `"<hex>"`.
fn flatten_object_ids(value: &mut Value) {
    let hex = match value {
        Value::Object(map) if map.len() == 1 => {
            map.get("$oid").and_then(Value::as_str).map(str::to_owned)
        }
        _ => None,
    };
    if let Some(hex) = hex {
        *value = Value::String(hex);
        return;
    }

    match value {
        Value::Object(map) => map.values_mut().for_each(flatten_object_ids),
        Value::Array(items) => items.iter_mut().for_each(flatten_object_ids),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ObjectId;

    #[test]
    fn object_ids_print_as_hex() {
        let person = NewPerson::new("Ana").with_age(25).into_person(ObjectId::new());
        let mut json = serde_json::to_value(vec![&person]).unwrap();
        flatten_object_ids(&mut json);

        assert_eq!(json[0]["_id"], Value::String(person.id.to_hex()));
        assert_eq!(json[0]["name"], "Ana");
        assert_eq!(json[0]["age"], 25);
    }

    #[test]
    fn other_objects_are_left_alone() {
        let mut json = serde_json::json!({ "removedCount": 2, "nested": { "$oid": 5 } });
        let expected = json.clone();
        flatten_object_ids(&mut json);
        assert_eq!(json, expected);
    }
}
