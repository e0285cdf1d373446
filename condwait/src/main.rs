use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use condwait::config::{load_config, Cli};
use condwait::tracing::setup_tracing;
use condwait::{ConditionWaiter, Event, EventType, InMemoryEventSource, StreamId};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Plays an agent thread which issues tool calls and later records their results.
async fn run_agent(
    source: Arc<InMemoryEventSource>,
    stream_id: StreamId,
    tool_calls: usize,
    delay: Duration,
) -> Result<()> {
    let tool_call: EventType = "TOOL_CALL".parse()?;
    let tool_result: EventType = "TOOL_RESULT".parse()?;
    let user_message: EventType = "USER_MESSAGE".parse()?;

    source.append(&stream_id, Event::new(user_message, json!("Execute tools")));

    for i in 0..tool_calls {
        tokio::time::sleep(delay).await;
        source.append(
            &stream_id,
            Event::new(tool_call.clone(), json!({ "id": format!("call_{i}") })),
        );
    }

    for i in 0..tool_calls {
        tokio::time::sleep(delay).await;
        source.append(
            &stream_id,
            Event::new(
                tool_result.clone(),
                json!({ "id": format!("call_{i}"), "output": "ok" }),
            ),
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("could not load configuration")?;
    setup_tracing(config.log_level.clone());

    let stream_id: StreamId = cli.stream_id.parse()?;
    let source = Arc::new(InMemoryEventSource::new());

    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling waits");
            ctrl_c_token.cancel();
        }
    });

    let agent = tokio::spawn(run_agent(
        source.clone(),
        stream_id.clone(),
        cli.tool_calls,
        Duration::from_millis(cli.delay_ms),
    ));

    let waiter =
        ConditionWaiter::from_config(source.clone(), &config).with_cancellation(cancellation_token);

    let tool_call: EventType = "TOOL_CALL".parse()?;
    let calls = waiter
        .wait_for_event_count(&stream_id, &tool_call, cli.tool_calls)
        .await?;
    info!("observed {} tool calls on {stream_id}", calls.len());

    if let Some(last_call) = calls.last() {
        let call_id = last_call.data["id"].as_str().unwrap_or_default().to_owned();
        let description = format!("TOOL_RESULT with id={call_id}");
        let result = waiter
            .wait_for_event_match(
                &stream_id,
                move |event| {
                    event.event_type.as_str() == "TOOL_RESULT" && event.data["id"] == call_id.as_str()
                },
                &description,
            )
            .await?;
        println!("‣ {description}: {}", result.data);
    }

    agent.await??;
    println!("‣ {} events recorded on {stream_id}", source.stream_len(&stream_id));

    Ok(())
}
