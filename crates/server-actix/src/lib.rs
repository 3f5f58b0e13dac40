// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod request;

use actix_web::{
    HttpRequest, HttpResponse, Responder,
    web::{self, ServiceConfig},
};
use graphql_router::GraphQLRouter;
use http::StatusCode;
use serde_json::Value;

use common::http::{ResponseBody, ResponsePayload};
use common::router::Router;
use request::{ActixRequestHead, ActixRequestPayload};

macro_rules! error_msg {
    ($msg:literal) => {
        concat!("{\"errors\": [{\"message\":\"", $msg, "\"}]}").as_bytes()
    };
}

pub fn configure_router(router: web::Data<GraphQLRouter>) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(router).default_service(web::to(resolve));
    }
}

async fn resolve(
    http_request: HttpRequest,
    body: web::Bytes,
    query: web::Query<Value>,
    router: web::Data<GraphQLRouter>,
) -> impl Responder {
    let mut request = ActixRequestPayload::new(
        ActixRequestHead::new(&http_request, query.into_inner()),
        body,
    );

    match router.route(&mut request).await {
        Some(ResponsePayload {
            body,
            headers,
            status_code,
        }) => {
            let actix_status_code = match to_actix_status_code(status_code) {
                Ok(status_code) => status_code,
                Err(err) => {
                    tracing::error!("Invalid status code: {}", err);
                    return HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
                        .content_type("application/json")
                        .body(error_msg!("Invalid status code"));
                }
            };

            let mut builder = HttpResponse::build(actix_status_code);

            for header in headers.into_iter() {
                builder.append_header(header);
            }

            match body {
                ResponseBody::Bytes(bytes) => builder.body(bytes),
                ResponseBody::None => builder.body(""),
            }
        }
        None => HttpResponse::build(actix_web::http::StatusCode::NOT_FOUND)
            .content_type("application/json")
            .body(error_msg!("Not found")),
    }
}

// Actix uses http-0.2 while the rest of the system uses http-1.x
fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| "Invalid status code".to_string())
}
