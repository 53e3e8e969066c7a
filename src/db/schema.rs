//! SQL DDL for the `users` and `emotions` tables.
//! SQLite dialect; every statement is `CREATE ... IF NOT EXISTS`.

use crate::error::TrackerError;

/// One creatable schema object and the objects it references.
#[derive(Debug, Clone, Copy)]
pub struct SchemaObject {
    pub name: &'static str,
    pub depends_on: &'static [&'static str],
    pub ddl: &'static str,
}

/// `users`:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, never reused
/// - `email` UNIQUE
/// - `isAdmin` BOOLEAN (stored as INTEGER 0/1)
/// - timestamps stored as `YYYY-MM-DD HH:MM:SS` text in UTC
pub const USERS: SchemaObject = SchemaObject {
    name: "users",
    depends_on: &[],
    ddl: r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email VARCHAR(100) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    password VARCHAR(255) NOT NULL,
    isAdmin BOOLEAN NOT NULL DEFAULT 0,
    account_created TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    face_data_path VARCHAR(255),
    last_login TIMESTAMP
)
"#,
};

/// `emotions`: rows are removed together with their owning user.
/// SQLite does not enforce VARCHAR lengths, hence the CHECK.
pub const EMOTIONS: SchemaObject = SchemaObject {
    name: "emotions",
    depends_on: &["users"],
    ddl: r#"
CREATE TABLE IF NOT EXISTS emotions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    emotion VARCHAR(50) NOT NULL CHECK (length(emotion) BETWEEN 1 AND 50),
    timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
)
"#,
};

/// Creation order. Referenced tables come first.
pub const SCHEMA: &[SchemaObject] = &[USERS, EMOTIONS];

/// Upper bound on `emotions.emotion`, mirrored by the CHECK constraint.
pub const EMOTION_LABEL_MAX: usize = 50;

/// Reject any list in which an object is declared before something it depends on.
pub fn validate_order(objects: &[SchemaObject]) -> Result<(), TrackerError> {
    for (idx, object) in objects.iter().enumerate() {
        let declared = &objects[..idx];
        if let Some(dependency) = object
            .depends_on
            .iter()
            .copied()
            .find(|dep| !declared.iter().any(|o| o.name == *dep))
        {
            return Err(TrackerError::SchemaOrder {
                object: object.name,
                dependency,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_schema_is_ordered() {
        assert!(validate_order(SCHEMA).is_ok());
        assert_eq!(SCHEMA[0].name, "users");
        assert_eq!(SCHEMA[1].name, "emotions");
    }

    #[test]
    fn dependent_before_dependency_is_rejected() {
        let err = validate_order(&[EMOTIONS, USERS]).unwrap_err();
        assert!(matches!(
            err,
            TrackerError::SchemaOrder {
                object: "emotions",
                dependency: "users"
            }
        ));
    }

    #[test]
    fn every_statement_is_idempotent_ddl() {
        for object in SCHEMA {
            assert!(object.ddl.contains("IF NOT EXISTS"), "{}", object.name);
        }
    }
}
