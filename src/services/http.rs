use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::pix::PixServiceRequest;
use crate::models::server::pix::{ChargeResponse, NewCharge, ValidatePayload, ValidateResponse};

#[derive(Clone)]
struct AppState {
    pix_channel: mpsc::Sender<PixServiceRequest>,
}

async fn request_new_charge(
    State(state): State<AppState>,
    Json(req): Json<NewCharge>,
) -> impl IntoResponse {
    let (pix_tx, pix_rx) = oneshot::channel();

    let tx_result = state
        .pix_channel
        .send(PixServiceRequest::NewCharge {
            amount_in_cents: req.amount_in_cents,
            description: req.description,
            txid: req.txid,
            response: pix_tx,
        })
        .await;

    if let Err(e) = tx_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"description": format!("Failed to process request: {}", e)})),
        );
    }

    match pix_rx.await {
        Ok(Ok(charge)) => {
            let response = ChargeResponse {
                txid: charge.txid,
                copy_paste: charge.copy_paste,
            };
            (StatusCode::CREATED, Json(json!(response)))
        }
        Ok(Err(service_error)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"description": service_error.to_string()})),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"description": format!("Failed to receive response: {}", e)})),
        ),
    }
}

async fn validate_payload(
    State(state): State<AppState>,
    Json(req): Json<ValidatePayload>,
) -> impl IntoResponse {
    let (pix_tx, pix_rx) = oneshot::channel();

    let tx_result = state
        .pix_channel
        .send(PixServiceRequest::ValidatePayload {
            payload: req.payload,
            response: pix_tx,
        })
        .await;

    if let Err(e) = tx_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"description": format!("Failed to process request: {}", e)})),
        );
    }

    match pix_rx.await {
        Ok(Ok(fields)) => {
            let response = ValidateResponse {
                valid: true,
                fields: Some(fields),
                description: None,
            };
            (StatusCode::OK, Json(json!(response)))
        }
        Ok(Err(service_error)) => {
            let response = ValidateResponse {
                valid: false,
                fields: None,
                description: Some(service_error.to_string()),
            };
            (StatusCode::OK, Json(json!(response)))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"description": format!("Failed to receive response: {}", e)})),
        ),
    }
}

pub async fn start_http_server(
    host: &str,
    port: u16,
    pix_channel: mpsc::Sender<PixServiceRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState { pix_channel };

    let app = Router::new()
        .route("/charge", post(request_new_charge))
        .route("/validate", post(validate_payload))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    println!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
