// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{App, HttpServer, middleware, web};

use async_graphql_executor::AsyncGraphQLExecutor;
use graphql_router::GraphQLRouter;
use server_actix::configure_router;
use star_wars::star_wars_schema;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use std::net::SocketAddr;
use std::time;
use std::{io::ErrorKind, sync::Arc};

use common::{
    env_const::{get_graphql_http_path, get_server_host, get_server_port},
    logging_tracing,
};

use nextql_env::{Environment, SystemEnvironment};

#[derive(Error)]
enum ServerError {
    #[error("Port {0} is already in use. Check if there is another process running at that port.")]
    PortInUse(u16),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] nextql_env::EnvError),
}

// Delegate to `Display` so that the process exits with a readable message
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// Serve the Star Wars schema over HTTP
#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    let start_time = time::SystemTime::now();

    logging_tracing::init();

    let env: Arc<dyn Environment> = Arc::new(SystemEnvironment);

    let executor = Arc::new(AsyncGraphQLExecutor::new(star_wars_schema()));
    let router = web::Data::new(GraphQLRouter::from_env(executor, env.clone())?);

    let server_host = get_server_host(env.as_ref());
    let server_port = get_server_port(env.as_ref())?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::new(
                middleware::TrailingSlash::Trim,
            ))
            .configure(configure_router(router.clone()))
    });

    match server.bind((server_host.as_str(), server_port)) {
        Ok(server) => {
            let pretty_addr = pretty_addr(&server.addrs());

            println!(
                "Started server on {} in {:.2} ms",
                pretty_addr,
                start_time
                    .elapsed()
                    .map(|elapsed| elapsed.as_micros() as f64 / 1000.0)
                    .unwrap_or_default()
            );
            println!("- GraphQL endpoint hosted at:");
            println!(
                "\thttp://{pretty_addr}{}",
                get_graphql_http_path(env.as_ref())
            );

            Ok(server.run().await?)
        }
        Err(e) => Err(if e.kind() == ErrorKind::AddrInUse {
            ServerError::PortInUse(server_port)
        } else {
            ServerError::Io(e)
        }),
    }
}

/// `localhost:<port>` when bound to a loopback address, otherwise the bound address(es)
fn pretty_addr(addrs: &[SocketAddr]) -> String {
    if let Some(loopback) = addrs.iter().find(|addr| addr.ip().is_loopback()) {
        return format!("localhost:{}", loopback.port());
    }

    match addrs {
        [addr] => addr.to_string(),
        _ => format!("{addrs:?}"),
    }
}
