use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Error running '{}', exit code {}\nstderr:\n{}", hint, code, stderr))]
    Command {
        hint: String,
        code: i32,
        stderr: String,
    },

    #[snafu(display("Failed to compress bootstrap document: {}", source))]
    CompressUserdata { source: std::io::Error },

    #[snafu(display("Unable to reach vCenter at '{}': {}", endpoint, message))]
    Connection { endpoint: String, message: String },

    #[snafu(display("Failed to deserialize govc {} output: {}", what, source))]
    DeserializeJson {
        what: String,
        source: serde_json::Error,
    },

    #[snafu(display("Unable to parse '{}' value '{}': {}", key, value, source))]
    EnvParse {
        key: String,
        value: String,
        source: std::num::ParseIntError,
    },

    #[snafu(display("Unable to read environment variable '{}': {}", key, source))]
    EnvRead {
        key: String,
        source: std::env::VarError,
    },

    #[snafu(display("Failed to escape SSH public key: {}", source))]
    EscapeKey { source: serde_json::Error },

    #[snafu(display("{} was missing from {}", what, from))]
    Missing { what: String, from: String },

    #[snafu(display("{} '{}' was not found in inventory", what, name))]
    NotFound { what: String, name: String },

    #[snafu(display("Failed to create '{}' process: {}", what, source))]
    Process {
        what: String,
        source: std::io::Error,
    },

    #[snafu(display("Invalid value for '{}': {}", field, message))]
    Validation { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
