//! AWS Lambda handler for report generation
//!
//! Accepts a report request as JSON via a Lambda Function URL / HTTP API and
//! returns the rendered report in the response body. Nothing is written to
//! disk: every invocation runs in in-memory mode.
//!
//! Query parameters: `format=html|csv|json` (default html), `date=YYYY-MM-DD`.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_DISPOSITION, CONTENT_TYPE,
};
use aws_lambda_events::http::{HeaderMap, HeaderValue, Method};
use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Serialize;
use std::time::Instant;

use rental_cashflow::{
    OutputMode, ReportFormat, ReportGenerator, ReportOptions, ReportRequest,
};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

fn error_response(status: i64, message: &str) -> ApiGatewayV2httpResponse {
    let mut headers = cors_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let body = serde_json::to_string(&ErrorBody {
        error: message.to_string(),
    })
    .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());

    ApiGatewayV2httpResponse {
        status_code: status,
        headers,
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

fn request_body(event: &ApiGatewayV2httpRequest) -> Result<String, String> {
    let Some(body) = event.body.as_deref() else {
        return Ok("{}".to_string());
    };
    if event.is_base64_encoded {
        let bytes = general_purpose::STANDARD
            .decode(body)
            .map_err(|e| format!("Invalid base64 body: {}", e))?;
        String::from_utf8(bytes).map_err(|e| format!("Body is not UTF-8: {}", e))
    } else {
        Ok(body.to_string())
    }
}

fn report_options(event: &ApiGatewayV2httpRequest) -> Result<ReportOptions, String> {
    let params = &event.query_string_parameters;
    let format = match params.first("format") {
        Some(value) => value.parse::<ReportFormat>()?,
        None => ReportFormat::Html,
    };
    let report_date = match params.first("date") {
        Some(value) => Some(
            value
                .parse::<NaiveDate>()
                .map_err(|e| format!("Invalid date '{}': {}", value, e))?,
        ),
        None => None,
    };
    Ok(ReportOptions {
        format,
        output: OutputMode::InMemory,
        report_date,
    })
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let start = Instant::now();
    let event = event.payload;

    // CORS preflight
    if event.request_context.http.method == Method::OPTIONS {
        return Ok(ApiGatewayV2httpResponse {
            status_code: 200,
            headers: cors_headers(),
            ..Default::default()
        });
    }

    let body = match request_body(&event) {
        Ok(body) => body,
        Err(message) => return Ok(error_response(400, &message)),
    };
    let request: ReportRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
    };
    let options = match report_options(&event) {
        Ok(options) => options,
        Err(message) => return Ok(error_response(400, &message)),
    };

    let input = request.into_input();
    let artifact = match ReportGenerator::default().generate(&input, &options).await {
        Ok(artifact) => artifact,
        Err(e) => {
            warn!("report generation failed: {}", e);
            return Ok(error_response(500, &e.to_string()));
        }
    };

    let mut headers = cors_headers();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(artifact.format.mime_type()),
    );
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", artifact.file_name))
    {
        headers.insert(CONTENT_DISPOSITION, disposition);
    }

    info!(
        "rendered {} ({} bytes) in {} ms",
        artifact.file_name,
        artifact.bytes.len(),
        start.elapsed().as_millis()
    );

    // Binary bodies serialize as base64
    Ok(ApiGatewayV2httpResponse {
        status_code: 200,
        headers,
        body: Some(Body::Binary(artifact.bytes)),
        is_base64_encoded: true,
        ..Default::default()
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
