use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use isu_dm::inputs::interpreter::interpret;
use isu_dm::kernel::types::Move;
use isu_dm::outputs::realizer::{realize, MISUNDERSTOOD};
use isu_dm::{lecture, DriverConfig, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let driver = DriverConfig::from_env();
    let mut session = lecture::session(EngineConfig::default())?;
    tracing::info!(session = %session.id, timeout_ms = driver.no_input_timeout_ms, "Dialogue manager booting...");

    // 2. Spawn Input Reader (Stdin)
    let (tx_input, mut rx_input) = mpsc::channel::<String>(100);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Err(e) = tx_input.send(line).await {
                tracing::error!("Failed to send input: {}", e);
                break;
            }
        }
    });

    say(&session.start()?);

    // 3. Turn loop: one cycle per utterance; waiting too long counts as silence.
    loop {
        let moves = match tokio::time::timeout(driver.no_input_timeout(), rx_input.recv()).await {
            Ok(Some(line)) => match interpret(&line) {
                Some(moves) => moves,
                None => {
                    tracing::info!("Unmapped input: '{}'", line);
                    println!("sys> {}", MISUNDERSTOOD);
                    continue;
                }
            },
            Ok(None) => break,
            Err(_) => vec![Move::no_input()],
        };
        say(&session.hear(moves)?);
    }

    let snapshot = session.telemetry.snapshot();
    tracing::info!(
        user_turns = snapshot.turn_stats.user_turns,
        escalations = snapshot.contact_stats.escalations,
        avg_firings = snapshot.turn_stats.avg_firings_per_turn,
        "Session closed"
    );
    Ok(())
}

fn say(moves: &[Move]) {
    let text = realize(moves);
    if text.is_empty() {
        println!("sys> {}", MISUNDERSTOOD);
    } else {
        println!("sys> {}", text);
    }
}
