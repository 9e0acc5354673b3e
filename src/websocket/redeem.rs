use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;

use crate::api::AppState;
use crate::models::RunSnapshot;

fn connected_payload() -> String {
    serde_json::json!({
        "type": "connected",
        "message": "Connected to redemption stream"
    })
    .to_string()
}

#[derive(Debug, Serialize)]
struct RunUpdate<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    #[serde(flatten)]
    snapshot: &'a RunSnapshot,
}

fn run_payload(snapshot: &RunSnapshot) -> String {
    serde_json::to_string(&RunUpdate {
        msg_type: "run_update",
        snapshot,
    })
    .unwrap_or_default()
}

/// WebSocket handler for live redemption-run updates
pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = state.executor.subscribe();

    let _ = sender.send(Message::Text(connected_payload().into())).await;

    // Push the state as it is now, then every change until the client leaves.
    let mut send_task = tokio::spawn(async move {
        let snapshot = updates.borrow_and_update().clone();
        if sender
            .send(Message::Text(run_payload(&snapshot).into()))
            .await
            .is_err()
        {
            return;
        }

        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if sender
                .send(Message::Text(run_payload(&snapshot).into()))
                .await
                .is_err()
            {
                return;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                tracing::info!("Redemption stream client disconnected");
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!("Redemption WebSocket connection closed");
}
