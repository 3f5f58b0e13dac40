use nextql_env::{EnvError, Environment, get_parsed};

pub const NEXTQL_GRAPHQL_HTTP_PATH: &str = "NEXTQL_GRAPHQL_HTTP_PATH";

pub const NEXTQL_BATCH_ENABLED: &str = "NEXTQL_BATCH_ENABLED";
pub const NEXTQL_CATCH_ERRORS: &str = "NEXTQL_CATCH_ERRORS";
pub const NEXTQL_PRETTY_JSON: &str = "NEXTQL_PRETTY_JSON";

pub const NEXTQL_SERVER_HOST: &str = "NEXTQL_SERVER_HOST";
pub const NEXTQL_SERVER_PORT: &str = "NEXTQL_SERVER_PORT";

pub fn get_graphql_http_path(env: &dyn Environment) -> String {
    env.get_or_else(NEXTQL_GRAPHQL_HTTP_PATH, "/graphql")
}

pub fn is_batch_enabled(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(NEXTQL_BATCH_ENABLED, false)
}

/// Should errors raised while executing a batch entry be swallowed (as opposed to failing the request)?
pub fn should_catch_errors(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(NEXTQL_CATCH_ERRORS, false)
}

pub fn is_pretty_json(env: &dyn Environment) -> Result<bool, EnvError> {
    env.enabled(NEXTQL_PRETTY_JSON, false)
}

pub fn get_server_host(env: &dyn Environment) -> String {
    env.get_or_else(NEXTQL_SERVER_HOST, "0.0.0.0")
}

pub fn get_server_port(env: &dyn Environment) -> Result<u16, EnvError> {
    get_parsed(env, NEXTQL_SERVER_PORT, 8000)
}
