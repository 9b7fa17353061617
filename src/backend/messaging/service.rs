//! Send path shared by the HTTP handler and tests
//!
//! A message is written to the database first and only then handed to the
//! presence registry. A failed insert therefore never reaches the receiver,
//! and a failed push never undoes the insert.

use sqlx::SqlitePool;

use crate::backend::messaging::db::save_message;
use crate::backend::presence::{PresenceRegistry, RelayOutcome};
use crate::shared::Message;

/// Persist `message`, then push it to the receiver's live connection
pub async fn persist_and_relay(
    pool: &SqlitePool,
    presence: &PresenceRegistry,
    message: Message,
) -> Result<(Message, RelayOutcome), sqlx::Error> {
    save_message(pool, &message).await?;

    // The registry logs each outcome.
    let outcome = presence.relay_message(&message);
    Ok((message, outcome))
}
