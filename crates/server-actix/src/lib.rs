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
    HttpRequest, HttpResponse,
    web::{self, ServiceConfig},
};
use common::http::{ResponseBody, ResponsePayload};
use http::StatusCode;
use serde_json::Value;
use server_common::FeedRouter;

use request::{ActixRequestHead, ActixRequestPayload};

macro_rules! error_msg {
    ($msg:literal) => {
        concat!(
            "{\"data\": null, \"errors\": [{\"message\":\"",
            $msg,
            "\", \"statusCode\": 500}]}"
        )
        .as_bytes()
    };
}

pub fn configure_router(router: web::Data<FeedRouter>) -> impl FnOnce(&mut ServiceConfig) {
    move |app| {
        app.app_data(router).default_service(web::to(resolve));
    }
}

/// Resolve a GraphQL request. Anything other than a POST to the GraphQL path is a 404.
async fn resolve(
    http_request: HttpRequest,
    body: Option<web::Json<Value>>,
    router: web::Data<FeedRouter>,
) -> HttpResponse {
    let mut request = ActixRequestPayload {
        head: ActixRequestHead::from_request(&http_request),
        body: body.map(|b| b.into_inner()).unwrap_or(Value::Null),
    };

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
                    return HttpResponse::InternalServerError()
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
        None => HttpResponse::NotFound().finish(),
    }
}

fn to_actix_status_code(status_code: StatusCode) -> Result<actix_web::http::StatusCode, String> {
    actix_web::http::StatusCode::from_u16(status_code.as_u16())
        .map_err(|_| "Invalid status code".to_string())
}
