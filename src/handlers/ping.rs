//! Ping handler for health checks

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize, Deserialize)]
struct PingRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PongResponse {
    message: String,
    timestamp: String,
}

/// Handle ping messages
pub async fn handle_ping(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received ping message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Ping message without reply subject");
                continue;
            }
        };

        client.publish(reply, pong_reply(&msg.payload)?.into()).await?;

        debug!("Sent pong response");
    }

    Ok(())
}

fn pong_reply(payload: &[u8]) -> Result<Vec<u8>> {
    // An empty body is a valid ping
    let request: PingRequest = if payload.is_empty() {
        PingRequest { message: None }
    } else {
        match serde_json::from_slice(payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse ping request: {}", e);
                let error_response = serde_json::json!({
                    "error": {
                        "code": "INVALID_REQUEST",
                        "message": format!("Failed to parse request: {}", e)
                    }
                });
                return Ok(error_response.to_string().into_bytes());
            }
        }
    };

    let response = PongResponse {
        message: request
            .message
            .map(|m| format!("Pong: {}", m))
            .unwrap_or_else(|| "Pong".to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    Ok(serde_json::to_vec(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_pong_echoes_message() {
        let reply: Value = serde_json::from_slice(&pong_reply(br#"{"message":"hi"}"#).unwrap()).unwrap();
        assert_eq!(reply["message"], "Pong: hi");
    }

    #[test]
    fn test_pong_empty_body() {
        let reply: Value = serde_json::from_slice(&pong_reply(b"").unwrap()).unwrap();
        assert_eq!(reply["message"], "Pong");
    }

    #[test]
    fn test_pong_invalid_body() {
        let reply: Value = serde_json::from_slice(&pong_reply(b"{").unwrap()).unwrap();
        assert_eq!(reply["error"]["code"], "INVALID_REQUEST");
    }
}
