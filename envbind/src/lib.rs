//! Bind tagged struct fields from environment variables
//!
//! `envbind` populates an existing struct in place. Each field that carries
//! an `#[env(key = "...")]` annotation is assigned from the environment
//! variable of that name; untagged fields are left alone, and nested structs
//! are walked so their own tagged fields are bound too.
//!
//! # Features
//!
//! - **In-place**: Fields keep their current value when a variable is not set
//! - **Optional fields**: `Option<T>` fields are only filled when a value is parsed
//! - **Nested records**: Struct-typed fields are walked recursively
//! - **Custom decoding**: A record can override the conversion of its own fields
//! - **File loading**: Decode a whole record from a file with any decoder
//!
//! # Value Parsing
//!
//! - Strings: taken as-is
//! - Booleans: `false` for `""`, `"0"` and any casing of `"false"`, `true` otherwise
//! - Integers: base 10, range checked for the field width. Malformed values are
//!   ignored and the field keeps its value
//! - Floats: malformed values abort the load with [`LoadError::Parse`]
//!
//! # Example
//!
//! ```rust
//! use envbind::EnvBind;
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Config {
//!     #[env(key = "SERVER_ADDR")]
//!     pub server_addr: String,
//!
//!     #[env(key = "MAX_CONNECTIONS")]
//!     pub max_connections: u32,
//!
//!     #[env(key = "RATE_LIMIT")]
//!     pub rate_limit: Option<f64>,
//!
//!     pub database: Database,
//! }
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Database {
//!     #[env(key = "DATABASE_URL")]
//!     pub url: String,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = HashMap::from([
//!     ("SERVER_ADDR".to_string(), "0.0.0.0:3000".to_string()),
//!     ("MAX_CONNECTIONS".to_string(), "oops".to_string()),
//!     ("DATABASE_URL".to_string(), "postgres://localhost/db".to_string()),
//! ]);
//!
//! let mut config = Config { max_connections: 10, ..Default::default() };
//! envbind::load_env_from(&mut config, &env)?;
//!
//! assert_eq!(config.server_addr, "0.0.0.0:3000");
//! assert_eq!(config.max_connections, 10);
//! assert_eq!(config.rate_limit, None);
//! assert_eq!(config.database.url, "postgres://localhost/db");
//! # Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[env(key = "NAME")]`
//!
//! Bind the field from `NAME`. An empty key disables binding.
//!
//! ## `#[env(skip)]`
//!
//! Leave the field out of the walk entirely. Needed for field types the
//! binder does not model, such as `Vec<T>`.
//!
//! ## `#[env(mode)]`
//!
//! Mark a [`Mode`] field that records whether the struct was last loaded from
//! a file or from the environment.
//!
//! ## `#[env(custom_decode)]` (struct-level)
//!
//! Route every tagged field through the struct's [`DecodeField`] impl before
//! the default conversion.

// Lets the derive's `::envbind` paths resolve inside this crate.
extern crate self as envbind;

mod bind;
pub mod config;
mod error;
mod field;
mod record;
mod source;
mod value;
mod walk;

pub use config::{load_from_env, load_from_file, Decoder, JsonDecoder, Mode};
pub use envbind_derive::EnvBind;
pub use error::LoadError;
pub use field::{Field, FieldDescriptor, FieldRef, Pointee, PointerSlot, ValueSlot};
pub use record::{DecodeField, Record, Target};
pub use source::{Environment, ProcessEnv};
pub use value::{CoerceError, Kind, Primitive, Value};
pub use walk::Walker;

// Re-export for user decoders
#[doc(hidden)]
pub use anyhow;

/// Bind a record from the process environment.
///
/// # Errors
///
/// - The target was passed by value ([`LoadError::NotMutable`])
/// - The target reference is null ([`LoadError::NullTarget`])
/// - A float variable cannot be parsed ([`LoadError::Parse`])
/// - A custom decoder fails or returns a value the field cannot hold
pub fn load_env<'a, T: Target<'a>>(target: T) -> Result<(), LoadError> {
    load_env_from(target, &ProcessEnv)
}

/// Bind a record from an explicit environment source.
///
/// # Errors
///
/// Same as [`load_env`].
pub fn load_env_from<'a, T, E>(target: T, env: &E) -> Result<(), LoadError>
where
    T: Target<'a>,
    E: Environment + ?Sized,
{
    let record = target.into_record()?;
    tracing::debug!(record = std::any::type_name::<T::Record>(), "binding record from environment");

    let env: &dyn Environment = &env;
    let result = Walker::new(env).walk_root(record);
    match &result {
        Ok(()) => tracing::debug!(record = std::any::type_name::<T::Record>(), "record bound from environment"),
        Err(err) => tracing::debug!(error = %err, "binding aborted"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field as TraceField, Visit};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    struct Messages(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut Vec<String>);

    impl Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &TraceField, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0.push(format!("{value:?}"));
            }
        }
    }

    impl<S: Subscriber> Layer<S> for Messages {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut messages = self.0.lock().unwrap();
            event.record(&mut MessageVisitor(&mut messages));
        }
    }

    #[derive(Debug, Default, EnvBind)]
    struct Server {
        #[env(key = "PORT")]
        port: u16,
        #[env(key = "RATIO")]
        ratio: f64,
    }

    fn captured(env: &HashMap<String, String>) -> (Result<(), LoadError>, Vec<String>) {
        let messages = Messages::default();
        let subscriber = tracing_subscriber::registry().with(messages.clone());
        let mut server = Server::default();
        let result = tracing::subscriber::with_default(subscriber, || load_env_from(&mut server, env));
        let lines = messages.0.lock().unwrap().clone();
        (result, lines)
    }

    #[test]
    fn test_load_logs_start_and_end() {
        let env = HashMap::from([("PORT".to_string(), "8080".to_string())]);
        let (result, lines) = captured(&env);

        assert!(result.is_ok());
        assert_eq!(lines.first().map(String::as_str), Some("binding record from environment"));
        assert_eq!(lines.last().map(String::as_str), Some("record bound from environment"));
    }

    #[test]
    fn test_failed_load_logs_abort() {
        let env = HashMap::from([("RATIO".to_string(), "half".to_string())]);
        let (result, lines) = captured(&env);

        assert!(matches!(result, Err(LoadError::Parse { .. })));
        assert_eq!(lines.last().map(String::as_str), Some("binding aborted"));
        assert!(!lines.iter().any(|line| line == "record bound from environment"));
    }
}
