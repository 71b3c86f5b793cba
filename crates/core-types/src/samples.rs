//! Seed records used by the CLI's `seed` command and by the integration tests.

use crate::structs::NewPerson;

/// The single person created by the "create and save" walkthrough.
pub fn maria_souza() -> NewPerson {
    NewPerson::new("Maria Souza")
        .with_age(28)
        .with_favorite_foods(["Açaí", "Sushi"])
}

/// The batch inserted by the "create many" walkthrough.
pub fn array_of_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new("Ana").with_age(25),
        NewPerson::new("Carlos").with_age(32),
    ]
}
